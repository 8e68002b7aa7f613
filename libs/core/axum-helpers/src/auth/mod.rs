//! Authentication and authorization module.
//!
//! This module provides:
//! - Stateless JWT token creation and verification
//! - Authentication middleware for protected routes
//! - `AuthUser` / `AdminUser` extractors for handlers
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! // Load config and create auth instance
//! let config = JwtConfig::from_env()?;
//! let auth = JwtAuth::new(&config);
//!
//! // Protect routes with JWT middleware
//! let protected = Router::new()
//!     .route("/api/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod user;

// Re-export commonly used types
pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims, TOKEN_TTL};
pub use middleware::{jwt_auth_middleware, optional_jwt_auth_middleware};
pub use user::{ADMIN_ROLE, AdminUser, AuthUser};
