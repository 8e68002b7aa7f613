use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Fixed message returned when a banned account attempts a write.
pub const BANNED_MESSAGE: &str = "Your account has been banned. Contact support for details.";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Signup-time duplicate; kept as 400 for API compatibility.
    #[error("A user with this {0} already exists")]
    SignupDuplicate(&'static str),

    /// Update-time duplicate; 409 naming the offending field.
    #[error("The {0} is already taken")]
    Conflict(&'static str),

    #[error("{BANNED_MESSAGE}")]
    Banned,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Token creation failed: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound("User not found".to_string()),
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            UserError::SignupDuplicate(field) => {
                AppError::BadRequest(format!("A user with this {field} already exists"))
            }
            UserError::Conflict(field) => {
                AppError::Conflict(format!("The {field} is already taken"))
            }
            UserError::Banned => AppError::Forbidden(BANNED_MESSAGE.to_string()),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::InvalidVerificationToken => {
                AppError::BadRequest("Invalid or expired verification token".to_string())
            }
            UserError::Hash(msg) | UserError::Token(msg) => AppError::InternalServerError(msg),
            UserError::Database(err) => AppError::Database(err),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
