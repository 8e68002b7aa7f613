use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_categories::CategoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Listing not found")]
    NotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Category lookup failed: {0}")]
    Category(#[from] CategoryError),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type ListingResult<T> = Result<T, ListingError>;

impl From<ListingError> for AppError {
    fn from(err: ListingError) -> Self {
        match err {
            ListingError::NotFound => AppError::NotFound("Listing not found".to_string()),
            ListingError::Forbidden(msg) => AppError::Forbidden(msg),
            ListingError::Validation(msg) => AppError::BadRequest(msg),
            ListingError::UnknownCategory(name) => {
                AppError::BadRequest(format!("Unknown category: {}", name))
            }
            ListingError::Category(err) => err.into(),
            ListingError::Database(err) => AppError::Database(err),
        }
    }
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
