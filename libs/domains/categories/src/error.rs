use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Main category not found: {0}")]
    MainNotFound(String),

    #[error("Category '{0}' already exists")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

/// Convert CategoryError to AppError for standardized error responses
impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::MainNotFound(name) => {
                AppError::NotFound(format!("Main category '{}' not found", name))
            }
            CategoryError::Duplicate(name) => {
                AppError::Conflict(format!("Category '{}' already exists", name))
            }
            CategoryError::Validation(msg) => AppError::BadRequest(msg),
            CategoryError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CategoryError {
    fn from(err: mongodb::error::Error) -> Self {
        CategoryError::Database(err.to_string())
    }
}
