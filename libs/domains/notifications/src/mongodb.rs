//! MongoDB implementation of NotificationRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database,
    bson::{Bson, doc, to_bson},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::NotificationResult;
use crate::models::{COLLECTION, Notification};
use crate::repository::NotificationRepository;

/// MongoDB implementation of the NotificationRepository
pub struct MongoNotificationRepository {
    collection: Collection<Notification>,
}

impl MongoNotificationRepository {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection::<Notification>(COLLECTION),
        }
    }

    fn user_filter(user_id: Uuid) -> mongodb::bson::Document {
        doc! { "user_id": to_bson(&user_id).unwrap_or(Bson::Null) }
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id))]
    async fn insert(&self, notification: Notification) -> NotificationResult<Notification> {
        self.collection.insert_one(&notification).await?;
        tracing::info!(notification_id = %notification.id, "Notification stored");
        Ok(notification)
    }

    #[instrument(skip(self))]
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> NotificationResult<Vec<Notification>> {
        use futures_util::TryStreamExt;

        let options = mongodb::options::FindOptions::builder()
            .limit(limit)
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(Self::user_filter(user_id))
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn unread_count(&self, user_id: Uuid) -> NotificationResult<u64> {
        let mut filter = Self::user_filter(user_id);
        filter.insert("is_read", false);
        Ok(self.collection.count_documents(filter).await?)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> NotificationResult<bool> {
        let mut filter = Self::user_filter(user_id);
        filter.insert("_id", to_bson(&id).unwrap_or(Bson::Null));

        let result = self
            .collection
            .update_one(
                filter,
                doc! { "$set": {
                    "is_read": true,
                    "updated_at": to_bson(&chrono::Utc::now()).unwrap_or(Bson::Null),
                } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self, user_id: Uuid) -> NotificationResult<u64> {
        let mut filter = Self::user_filter(user_id);
        filter.insert("is_read", false);

        let result = self
            .collection
            .update_many(
                filter,
                doc! { "$set": {
                    "is_read": true,
                    "updated_at": to_bson(&chrono::Utc::now()).unwrap_or(Bson::Null),
                } },
            )
            .await?;
        Ok(result.modified_count)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid, user_id: Uuid) -> NotificationResult<bool> {
        let mut filter = Self::user_filter(user_id);
        filter.insert("_id", to_bson(&id).unwrap_or(Bson::Null));

        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }
}
