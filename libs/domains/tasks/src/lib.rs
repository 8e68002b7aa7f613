//! Background task queue backed by MongoDB.
//!
//! Tasks are persisted documents claimed atomically by a polling worker.
//! Handlers are registered by task name; failures are retried with a
//! fixed backoff.

pub mod assets;
pub mod email;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;
pub mod worker;

pub use assets::{AssetStoreConfig, DeleteImageHandler};
pub use email::VerificationEmailHandler;
pub use error::{TaskError, TaskResult};
pub use models::{
    DELETE_REMOTE_IMAGE, DeleteImagePayload, SEND_VERIFICATION_EMAIL, Task, TaskStatus,
    VerificationEmailPayload,
};
pub use store::{MongoTaskStore, TaskStore};
pub use worker::{TaskHandler, TaskWorker};
