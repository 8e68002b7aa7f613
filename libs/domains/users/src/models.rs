use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Account role carried in the JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// User account (stored in the `users` collection)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Globally unique, enforced by a unique index
    pub username: String,
    /// Globally unique, enforced by a unique index
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub role: Role,
    /// Favorite listing keys (`id` or `id,mainCategory[,subCategory]`)
    pub favorites: Vec<String>,
    pub is_banned: bool,
    pub banned_reason: Option<String>,
    pub banned_at: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub verification_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash,
            avatar: None,
            role: Role::User,
            favorites: Vec::new(),
            is_banned: false,
            banned_reason: None,
            banned_at: None,
            is_verified: false,
            verification_token: None,
            verification_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User as exposed over the API (no credentials)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: Role,
    pub favorites: Vec<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            role: user.role,
            favorites: user.favorites,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// DTO for signup
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignUp {
    #[validate(length(min = 3, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// DTO for signin
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignIn {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// DTO for OAuth-style login-or-register
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OAuthLogin {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 60))]
    pub display_name: String,
    pub avatar: Option<String>,
}

/// DTO for profile updates; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 3, max = 30))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
    pub avatar: Option<String>,
}

/// Auth response: the public profile plus a bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}
