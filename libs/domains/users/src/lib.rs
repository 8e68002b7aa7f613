//! Users domain: accounts, credentials, favorites, verification and bans.
//!
//! Passwords are hashed with argon2; sessions are stateless JWTs issued
//! at signup/signin. Verification emails go through the background task
//! runner via the [`service::VerificationMailer`] trait, so HTTP callers
//! never wait on SMTP.
//!
//! # Architecture
//!
//! - [`models`] - user entity and DTOs
//! - [`repository`] - storage trait
//! - [`mongodb`] - MongoDB implementation with unique indexes
//! - [`service`] - business logic
//! - [`middleware`] - ban guard for write actions
//! - [`handlers`] - HTTP endpoints and OpenAPI documentation

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{BANNED_MESSAGE, UserError, UserResult};
pub use middleware::ban_guard;
pub use models::{PublicUser, Role, User};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::{UserService, VerificationMailer};
