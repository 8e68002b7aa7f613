//! Notification Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{NotificationError, NotificationResult};
use crate::models::Notification;
use crate::registry::NotificationPush;
use crate::repository::NotificationRepository;

const DEFAULT_LIST_LIMIT: i64 = 50;

/// Notification service providing persistence plus best-effort push
pub struct NotificationService<R: NotificationRepository> {
    repository: Arc<R>,
    push: Arc<dyn NotificationPush>,
}

impl<R: NotificationRepository> NotificationService<R> {
    pub fn new(repository: R, push: Arc<dyn NotificationPush>) -> Self {
        Self {
            repository: Arc::new(repository),
            push,
        }
    }

    /// Persist a notification, then push it to the recipient if online.
    ///
    /// The push happens only after the write succeeds, so a connected
    /// client never sees a notification that isn't durable.
    #[instrument(skip(self, title, message))]
    pub async fn notify(
        &self,
        user_id: Uuid,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> NotificationResult<Notification> {
        let notification = self
            .repository
            .insert(Notification::new(user_id, title, message))
            .await?;

        let delivered = self.push.push(&notification).await;
        tracing::debug!(notification_id = %notification.id, delivered, "Notification dispatched");

        Ok(notification)
    }

    /// List the recipient's notifications, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Uuid) -> NotificationResult<Vec<Notification>> {
        self.repository
            .list_for_user(user_id, DEFAULT_LIST_LIMIT)
            .await
    }

    /// Count unread notifications
    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: Uuid) -> NotificationResult<u64> {
        self.repository.unread_count(user_id).await
    }

    /// Mark one notification as read
    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> NotificationResult<()> {
        if !self.repository.mark_read(id, user_id).await? {
            return Err(NotificationError::NotFound(id));
        }
        Ok(())
    }

    /// Mark all notifications as read
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: Uuid) -> NotificationResult<u64> {
        self.repository.mark_all_read(user_id).await
    }

    /// Delete one notification
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> NotificationResult<()> {
        if !self.repository.delete(id, user_id).await? {
            return Err(NotificationError::NotFound(id));
        }
        Ok(())
    }
}

impl<R: NotificationRepository> Clone for NotificationService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            push: Arc::clone(&self.push),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OnlineRegistry;
    use crate::repository::MockNotificationRepository;

    #[tokio::test]
    async fn test_notify_persists_before_push() {
        let registry = OnlineRegistry::new();
        let user_id = Uuid::now_v7();
        let mut rx = registry.register(user_id).await;

        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().returning(Ok);

        let service = NotificationService::new(repo, registry);
        let notification = service.notify(user_id, "Listing Approved ✅", "…").await.unwrap();

        assert_eq!(notification.user_id, user_id);
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_notify_swallows_failed_push() {
        let registry = OnlineRegistry::new();

        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().returning(Ok);

        let service = NotificationService::new(repo, registry);
        // Recipient is offline; notify still succeeds
        assert!(service.notify(Uuid::now_v7(), "t", "m").await.is_ok());
    }

    #[tokio::test]
    async fn test_mark_read_not_found() {
        let registry = OnlineRegistry::new();
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read().returning(|_, _| Ok(false));

        let service = NotificationService::new(repo, registry);
        let result = service.mark_read(Uuid::now_v7(), Uuid::now_v7()).await;
        assert!(matches!(result, Err(NotificationError::NotFound(_))));
    }
}
