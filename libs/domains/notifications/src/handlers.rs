use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use axum_helpers::{
    AppError, AuthUser,
    errors::responses::{InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::models::Notification;
use crate::repository::NotificationRepository;
use crate::service::NotificationService;

/// OpenAPI documentation for Notifications API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_notifications,
        unread_count,
        mark_read,
        mark_all_read,
        delete_notification,
    ),
    components(
        schemas(Notification, UnreadCount),
        responses(UnauthorizedResponse, NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Notifications", description = "In-app notification endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Serialize, ToSchema)]
pub struct UnreadCount {
    pub unread: u64,
}

/// Create the notifications router (all routes owner-scoped)
pub fn router<R: NotificationRepository + 'static>(service: NotificationService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_notifications))
        .route("/unread", get(unread_count))
        .route("/read-all", post(mark_all_read))
        .route("/{id}/read", post(mark_read))
        .route("/{id}", delete(delete_notification))
        .with_state(shared_service)
}

fn parse_user_id(sub: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(sub).map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
}

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Notifications",
    responses(
        (status = 200, description = "Notifications", body = Vec<Notification>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn list_notifications<R: NotificationRepository>(
    State(service): State<Arc<NotificationService<R>>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<Notification>>, AppError> {
    let user_id = parse_user_id(&claims.sub)?;
    let notifications = service.list(user_id).await?;
    Ok(Json(notifications))
}

/// Count the caller's unread notifications
#[utoipa::path(
    get,
    path = "/unread",
    tag = "Notifications",
    responses(
        (status = 200, description = "Unread count", body = UnreadCount),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn unread_count<R: NotificationRepository>(
    State(service): State<Arc<NotificationService<R>>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UnreadCount>, AppError> {
    let user_id = parse_user_id(&claims.sub)?;
    let unread = service.unread_count(user_id).await?;
    Ok(Json(UnreadCount { unread }))
}

/// Mark one notification as read
#[utoipa::path(
    post,
    path = "/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn mark_read<R: NotificationRepository>(
    State(service): State<Arc<NotificationService<R>>>,
    AuthUser(claims): AuthUser,
    axum_helpers::UuidPath(id): axum_helpers::UuidPath,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_user_id(&claims.sub)?;
    service.mark_read(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark all notifications as read
#[utoipa::path(
    post,
    path = "/read-all",
    tag = "Notifications",
    responses(
        (status = 204, description = "All marked as read"),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn mark_all_read<R: NotificationRepository>(
    State(service): State<Arc<NotificationService<R>>>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_user_id(&claims.sub)?;
    service.mark_all_read(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn delete_notification<R: NotificationRepository>(
    State(service): State<Arc<NotificationService<R>>>,
    AuthUser(claims): AuthUser,
    axum_helpers::UuidPath(id): axum_helpers::UuidPath,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_user_id(&claims.sub)?;
    service.delete(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
