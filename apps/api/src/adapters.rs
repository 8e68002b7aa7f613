//! Bridges between domains and the background task queue.
//!
//! Domains that need slow side effects (email, remote asset deletion)
//! depend on small traits; these adapters satisfy them by enqueuing
//! durable tasks. Enqueue failures are logged and swallowed, the HTTP
//! caller has already been answered by then.

use std::sync::Arc;

use async_trait::async_trait;
use domain_listings::AssetCleanup;
use domain_tasks::{
    DELETE_REMOTE_IMAGE, DeleteImagePayload, MongoTaskStore, SEND_VERIFICATION_EMAIL, Task,
    TaskStore, VerificationEmailPayload,
};
use domain_users::VerificationMailer;
use tracing::error;

/// Enqueues side-effect tasks on behalf of the domain crates.
pub struct TaskQueue {
    store: Arc<MongoTaskStore>,
}

impl TaskQueue {
    pub fn new(store: Arc<MongoTaskStore>) -> Self {
        Self { store }
    }

    async fn enqueue(&self, name: &str, payload: serde_json::Value) {
        if let Err(err) = self.store.enqueue(Task::new(name, payload)).await {
            error!(task = name, "Failed to enqueue task: {err}");
        }
    }
}

#[async_trait]
impl VerificationMailer for TaskQueue {
    async fn queue_verification(&self, email: &str, username: &str, token: &str) {
        let payload = VerificationEmailPayload {
            to: email.to_string(),
            username: username.to_string(),
            token: token.to_string(),
        };
        match serde_json::to_value(&payload) {
            Ok(payload) => self.enqueue(SEND_VERIFICATION_EMAIL, payload).await,
            Err(err) => error!("Failed to serialize verification email payload: {err}"),
        }
    }
}

#[async_trait]
impl AssetCleanup for TaskQueue {
    async fn discard_image(&self, public_id: &str) {
        let payload = DeleteImagePayload {
            public_id: public_id.to_string(),
        };
        match serde_json::to_value(&payload) {
            Ok(payload) => self.enqueue(DELETE_REMOTE_IMAGE, payload).await,
            Err(err) => error!("Failed to serialize image deletion payload: {err}"),
        }
    }
}
