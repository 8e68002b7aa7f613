//! Notifications Domain
//!
//! In-app notifications for marketplace users, plus the outbound email
//! channel used for account verification.
//!
//! Notifications are persisted first and then pushed best-effort over an
//! open WebSocket if the recipient is connected. Delivery is never
//! guaranteed; the persisted document is the source of truth and clients
//! fetch unread notifications on connect.
//!
//! Other domains that create notifications inside their own transactions
//! (e.g. moderation decisions) write to the [`models::COLLECTION`]
//! collection directly with their session, then call
//! [`registry::NotificationPush::push`] after commit.

pub mod email;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod registry;
pub mod repository;
pub mod service;
pub mod ws;

// Re-export commonly used types
pub use error::{NotificationError, NotificationResult};
pub use handlers::ApiDoc;
pub use models::Notification;
pub use mongodb::MongoNotificationRepository;
pub use registry::{NotificationPush, OnlineRegistry};
pub use repository::NotificationRepository;
pub use service::NotificationService;
