//! MongoDB implementation of UserRepository.

use async_trait::async_trait;
use axum_helpers::errors::is_duplicate_key_error;
use chrono::{DateTime, Utc};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_bson},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::{ProfileChanges, UserRepository};

/// Collection name for user accounts.
pub const COLLECTION: &str = "users";

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    users: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection(COLLECTION),
        }
    }

    /// Create the unique indexes on `username` and `email`. Called once
    /// at startup; creating an existing index is a no-op.
    pub async fn ensure_indexes(db: &Database) -> UserResult<()> {
        let users = db.collection::<User>(COLLECTION);
        for field in ["username", "email"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();
            users.create_index(index).await?;
        }
        tracing::info!("User indexes ensured");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    /// Which unique field a duplicate-key error names. The driver's
    /// message carries the index name (`username_1` or `email_1`).
    fn duplicate_field(err: &mongodb::error::Error) -> &'static str {
        if err.to_string().contains("email") {
            "email"
        } else {
            "username"
        }
    }

    fn now_bson() -> Bson {
        to_bson(&Utc::now()).unwrap_or(Bson::Null)
    }

    async fn update_returning(
        &self,
        filter: Document,
        update: Document,
    ) -> UserResult<Option<User>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let user = self
            .users
            .find_one_and_update(filter, update)
            .with_options(options)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: User) -> UserResult<User> {
        match self.users.insert_one(&user).await {
            Ok(_) => {
                tracing::info!(user_id = %user.id, "User created");
                Ok(user)
            }
            Err(err) if is_duplicate_key_error(&err) => {
                Err(UserError::SignupDuplicate(Self::duplicate_field(&err)))
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.users.find_one(Self::id_filter(id)).await?)
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        Ok(self.users.find_one(doc! { "username": username }).await?)
    }

    #[instrument(skip(self, changes))]
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> UserResult<Option<User>> {
        let mut set = doc! { "updated_at": Self::now_bson() };
        if let Some(username) = &changes.username {
            set.insert("username", username);
        }
        if let Some(email) = &changes.email {
            set.insert("email", email);
        }
        if let Some(hash) = &changes.password_hash {
            set.insert("password_hash", hash);
        }
        if let Some(avatar) = &changes.avatar {
            set.insert("avatar", avatar);
        }

        match self
            .update_returning(Self::id_filter(id), doc! { "$set": set })
            .await
        {
            Ok(user) => Ok(user),
            Err(UserError::Database(err)) if is_duplicate_key_error(&err) => {
                Err(UserError::Conflict(Self::duplicate_field(&err)))
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self, key))]
    async fn add_favorite(&self, id: Uuid, key: &str) -> UserResult<bool> {
        let result = self
            .users
            .update_one(
                Self::id_filter(id),
                doc! {
                    "$addToSet": { "favorites": key },
                    "$set": { "updated_at": Self::now_bson() },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self, key))]
    async fn remove_favorite(&self, id: Uuid, key: &str) -> UserResult<bool> {
        let result = self
            .users
            .update_one(
                Self::id_filter(id),
                doc! {
                    "$pull": { "favorites": key },
                    "$set": { "updated_at": Self::now_bson() },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self.users.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self, token))]
    async fn set_verification(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> UserResult<bool> {
        let result = self
            .users
            .update_one(
                Self::id_filter(id),
                doc! { "$set": {
                    "verification_token": token,
                    "verification_expires_at": to_bson(&expires_at).unwrap_or(Bson::Null),
                    "updated_at": Self::now_bson(),
                }},
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self, token))]
    async fn find_by_verification_token(&self, token: &str) -> UserResult<Option<User>> {
        Ok(self
            .users
            .find_one(doc! { "verification_token": token })
            .await?)
    }

    #[instrument(skip(self))]
    async fn mark_verified(&self, id: Uuid) -> UserResult<bool> {
        let result = self
            .users
            .update_one(
                Self::id_filter(id),
                doc! {
                    "$set": { "is_verified": true, "updated_at": Self::now_bson() },
                    "$unset": { "verification_token": "", "verification_expires_at": "" },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self, reason))]
    async fn set_ban<'a>(
        &self,
        id: Uuid,
        banned: bool,
        reason: Option<&'a str>,
    ) -> UserResult<bool> {
        let update = if banned {
            doc! { "$set": {
                "is_banned": true,
                "banned_reason": reason.unwrap_or("No reason provided"),
                "banned_at": Self::now_bson(),
                "updated_at": Self::now_bson(),
            }}
        } else {
            doc! {
                "$set": { "is_banned": false, "updated_at": Self::now_bson() },
                "$unset": { "banned_reason": "", "banned_at": "" },
            }
        };
        let result = self.users.update_one(Self::id_filter(id), update).await?;
        Ok(result.matched_count > 0)
    }
}
