//! API routes module
//!
//! One file per domain; each wires a MongoDB store into the domain's
//! service and returns the domain's router.

pub mod categories;
pub mod dashboard;
pub mod health;
pub mod listings;
pub mod notifications;
pub mod tasks;
pub mod users;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum_helpers::optional_jwt_auth_middleware;
use domain_users::{MongoUserRepository, ban_guard};

use crate::adapters::TaskQueue;
use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    let queue = Arc::new(TaskQueue::new(Arc::clone(&state.tasks)));
    let user_service = Arc::new(users::service(state, queue.clone()));
    let category_service = categories::service(state);

    // Banned users keep read access; the guard only blocks writes.
    let guard = |router: Router| {
        router.layer(from_fn_with_state(
            user_service.clone(),
            ban_guard::<MongoUserRepository>,
        ))
    };

    Router::new()
        .nest(
            "/listings",
            guard(listings::router(state, &category_service, queue.clone())),
        )
        .nest("/users", guard(users::router((*user_service).clone())))
        .nest("/categories", categories::router(category_service))
        .nest("/notifications", notifications::router(state))
        .nest("/dashboard", dashboard::router(state))
        .nest("/tasks", guard(tasks::router(state)))
        .merge(health::router(state.clone()))
        .layer(from_fn_with_state(
            state.jwt.clone(),
            optional_jwt_auth_middleware,
        ))
}
