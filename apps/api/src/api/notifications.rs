//! Notifications API routes, including the WebSocket endpoint

use std::sync::Arc;

use axum::Router;
use domain_notifications::{
    MongoNotificationRepository, NotificationPush, NotificationService, handlers, ws,
};

use crate::state::AppState;

/// Create notifications router
pub fn router(state: &AppState) -> Router {
    let repository = MongoNotificationRepository::new(state.db.clone());
    let service = NotificationService::new(
        repository,
        Arc::clone(&state.registry) as Arc<dyn NotificationPush>,
    );

    handlers::router(service).merge(ws::router(Arc::clone(&state.registry)))
}
