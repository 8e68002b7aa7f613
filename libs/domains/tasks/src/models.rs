use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Collection holding the durable task queue.
pub const COLLECTION: &str = "tasks";

/// Task name for queued verification emails.
pub const SEND_VERIFICATION_EMAIL: &str = "send verification email";
/// Task name for deferred remote-image deletion.
pub const DELETE_REMOTE_IMAGE: &str = "delete remote image";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
}

/// One durable queued task (stored in the `tasks` collection).
///
/// A task is claimed by flipping pending to running atomically; a failed
/// run flips it back with `run_at` pushed into the future, so execution
/// is at-least-once.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub status: TaskStatus,
    /// Earliest time the task may run
    pub run_at: DateTime<Utc>,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            payload,
            status: TaskStatus::Pending,
            run_at: now,
            attempts: 0,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload of a [`SEND_VERIFICATION_EMAIL`] task.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationEmailPayload {
    pub to: String,
    pub username: String,
    pub token: String,
}

/// Payload of a [`DELETE_REMOTE_IMAGE`] task.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteImagePayload {
    pub public_id: String,
}
