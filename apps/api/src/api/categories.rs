//! Categories API routes

use axum::Router;
use domain_categories::{CategoryService, MongoCategoryRepository, handlers};

use crate::state::AppState;

/// Build the category service over the shared database
pub fn service(state: &AppState) -> CategoryService<MongoCategoryRepository> {
    CategoryService::new(MongoCategoryRepository::new(state.db.clone()))
}

/// Create categories router
pub fn router(service: CategoryService<MongoCategoryRepository>) -> Router {
    handlers::router(service)
}
