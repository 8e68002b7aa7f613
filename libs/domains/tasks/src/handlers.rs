use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_helpers::{
    AuthUser,
    errors::responses::{InternalServerErrorResponse, UnauthorizedResponse},
};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use crate::error::TaskResult;
use crate::models::{DELETE_REMOTE_IMAGE, DeleteImagePayload, Task};
use crate::store::TaskStore;

#[derive(OpenApi)]
#[openapi(
    paths(request_image_deletion),
    components(schemas(ImageDeletionRequest), responses(InternalServerErrorResponse, UnauthorizedResponse)),
    tags((name = "tasks", description = "Background task endpoints"))
)]
pub struct ApiDoc;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImageDeletionRequest {
    pub public_id: String,
}

/// Queue deletion of an uploaded image from the asset store.
#[utoipa::path(
    post,
    path = "/images/delete",
    tag = "tasks",
    request_body = ImageDeletionRequest,
    responses(
        (status = 202, description = "Deletion queued"),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(store))]
async fn request_image_deletion<S: TaskStore>(
    State(store): State<Arc<S>>,
    AuthUser(claims): AuthUser,
    Json(request): Json<ImageDeletionRequest>,
) -> TaskResult<StatusCode> {
    let payload = serde_json::to_value(DeleteImagePayload {
        public_id: request.public_id,
    })?;
    store
        .enqueue(Task::new(DELETE_REMOTE_IMAGE, payload))
        .await?;
    tracing::info!(user = %claims.sub, "Image deletion queued");
    Ok(StatusCode::ACCEPTED)
}

pub fn router<S: TaskStore + 'static>(store: Arc<S>) -> Router {
    Router::new()
        .route("/images/delete", post(request_image_deletion::<S>))
        .with_state(store)
}
