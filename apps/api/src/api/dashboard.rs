//! Dashboard API routes

use std::sync::Arc;

use axum::Router;
use domain_dashboard::{DashboardService, MongoDashboardStore, handlers};

use crate::state::AppState;

/// Create dashboard router (admin-only endpoints)
pub fn router(state: &AppState) -> Router {
    let store = Arc::new(MongoDashboardStore::new(&state.db));
    handlers::router(DashboardService::new(store))
}
