//! Background task API routes

use std::sync::Arc;

use axum::Router;
use domain_tasks::handlers;

use crate::state::AppState;

/// Create tasks router (asset-deletion requests)
pub fn router(state: &AppState) -> Router {
    handlers::router(Arc::clone(&state.tasks))
}
