//! Shared application state.

use std::sync::Arc;

use axum_helpers::JwtAuth;
use domain_notifications::OnlineRegistry;
use domain_tasks::MongoTaskStore;
use mongodb::Database;

/// Shared application state.
///
/// Cloned per router (inexpensive Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB database handle (shares the underlying connection pool)
    pub db: Database,
    /// JWT signing/verification
    pub jwt: JwtAuth,
    /// Connected WebSocket clients, shared with the notification push path
    pub registry: Arc<OnlineRegistry>,
    /// Durable background task queue
    pub tasks: Arc<MongoTaskStore>,
}
