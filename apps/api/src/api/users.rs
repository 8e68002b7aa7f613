//! Users API routes

use std::sync::Arc;

use axum::Router;
use domain_users::{MongoUserRepository, UserService, handlers};

use crate::adapters::TaskQueue;
use crate::state::AppState;

/// Build the user service over the shared database
pub fn service(state: &AppState, queue: Arc<TaskQueue>) -> UserService<MongoUserRepository> {
    let repository = MongoUserRepository::new(&state.db);
    UserService::new(repository, Arc::new(state.jwt.clone()), queue)
}

/// Create users router
pub fn router(service: UserService<MongoUserRepository>) -> Router {
    handlers::router(service)
}
