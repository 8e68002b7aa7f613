use async_trait::async_trait;
use uuid::Uuid;

use crate::error::NotificationResult;
use crate::models::Notification;

/// Repository trait for notification persistence
///
/// All read and mutation operations are scoped to the recipient's user id,
/// so one user can never touch another user's notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert a notification
    async fn insert(&self, notification: Notification) -> NotificationResult<Notification>;

    /// List a user's notifications, newest first
    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> NotificationResult<Vec<Notification>>;

    /// Count a user's unread notifications
    async fn unread_count(&self, user_id: Uuid) -> NotificationResult<u64>;

    /// Mark one notification as read; `false` when it does not exist
    /// or belongs to another user
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> NotificationResult<bool>;

    /// Mark all of a user's notifications as read, returning how many changed
    async fn mark_all_read(&self, user_id: Uuid) -> NotificationResult<u64>;

    /// Delete one notification; `false` when nothing matched
    async fn delete(&self, id: Uuid, user_id: Uuid) -> NotificationResult<bool>;
}
