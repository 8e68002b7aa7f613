use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::User;

/// Field-level profile changes, already hashed where needed.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub avatar: Option<String>,
}

/// Storage abstraction for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Unique-index violations surface as
    /// [`crate::error::UserError::SignupDuplicate`] naming the field.
    async fn insert(&self, user: User) -> UserResult<User>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>>;

    /// Apply profile changes, returning the updated user. Unique-index
    /// violations surface as [`crate::error::UserError::Conflict`].
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> UserResult<Option<User>>;

    /// `$addToSet`: adding an already-present key is a no-op.
    async fn add_favorite(&self, id: Uuid, key: &str) -> UserResult<bool>;

    /// `$pull`: removing an absent key is a no-op.
    async fn remove_favorite(&self, id: Uuid, key: &str) -> UserResult<bool>;

    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    async fn set_verification(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> UserResult<bool>;

    async fn find_by_verification_token(&self, token: &str) -> UserResult<Option<User>>;

    /// Mark the account verified and clear the pending token.
    async fn mark_verified(&self, id: Uuid) -> UserResult<bool>;

    async fn set_ban<'a>(&self, id: Uuid, banned: bool, reason: Option<&'a str>)
        -> UserResult<bool>;
}
