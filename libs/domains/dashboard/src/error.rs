use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Malformed aggregation result: {0}")]
    Malformed(String),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Database(err) => AppError::Database(err),
            DashboardError::Malformed(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
