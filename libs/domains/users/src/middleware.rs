//! Ban enforcement for write actions.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, JwtClaims};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::BANNED_MESSAGE;
use crate::repository::UserRepository;
use crate::service::UserService;

/// Reject write requests from banned accounts with a fixed 403 message.
///
/// Reads (GET/HEAD/OPTIONS) pass through so banned users can still browse;
/// unauthenticated requests pass through untouched and are handled by the
/// auth middleware instead.
pub async fn ban_guard<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    if matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    ) {
        return Ok(next.run(request).await);
    }

    let Some(claims) = request.extensions().get::<JwtClaims>() else {
        return Ok(next.run(request).await);
    };
    let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
        return Ok(next.run(request).await);
    };

    match service.is_banned(user_id).await {
        Ok(true) => {
            tracing::warn!(%user_id, "Write blocked for banned account");
            Err(AppError::Forbidden(BANNED_MESSAGE.to_string()).into_response())
        }
        Ok(false) => Ok(next.run(request).await),
        Err(err) => Err(AppError::from(err).into_response()),
    }
}
