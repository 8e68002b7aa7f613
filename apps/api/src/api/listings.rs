//! Listings API routes

use std::sync::Arc;

use axum::Router;
use domain_categories::{CategoryLookup, CategoryService, MongoCategoryRepository};
use domain_listings::{ListingService, MongoListingStore, handlers};
use domain_notifications::NotificationPush;

use crate::adapters::TaskQueue;
use crate::state::AppState;

/// Create listings router
///
/// The category registry backs the strict create-time check, the online
/// registry receives post-commit moderation pushes, and the task queue
/// absorbs image cleanup after deletes.
pub fn router(
    state: &AppState,
    categories: &CategoryService<MongoCategoryRepository>,
    queue: Arc<TaskQueue>,
) -> Router {
    let store = MongoListingStore::new(state.db.client().clone(), &state.db);

    let service = ListingService::new(
        store,
        Arc::new(categories.clone()) as Arc<dyn CategoryLookup>,
        Arc::clone(&state.registry) as Arc<dyn NotificationPush>,
        queue,
    );

    handlers::router(service)
}
