use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Collection name, shared with domains that write notifications
/// inside their own transactions.
pub const COLLECTION: &str = "notifications";

/// Notification entity (stored in the `notifications` collection)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Recipient user id
    pub user_id: Uuid,
    /// Short title, e.g. "Listing Approved ✅"
    pub title: String,
    /// Body text
    pub message: String,
    /// Whether the recipient has seen it
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, title: impl Into<String>, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            title: title.into(),
            message: message.into(),
            is_read: false,
            created_at: now,
            updated_at: now,
        }
    }
}
