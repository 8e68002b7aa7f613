use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Token time-to-live in seconds (7 days)
pub const TOKEN_TTL: i64 = 604800;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,            // Subject (user ID)
    pub username: String,       // Display name
    pub avatar: Option<String>, // Profile picture URL
    pub role: String,           // "user" or "admin"
    pub exp: i64,               // Expiration time
    pub iat: i64,               // Issued at
}

/// Stateless JWT authentication.
///
/// Tokens are signed with HS256 and carry the user's id, username and role,
/// so protected handlers never need a database round-trip to authorize.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!("JWT auth initialized");
        Self {
            secret: config.secret.clone(),
        }
    }

    /// Create a signed token for the given user (expires after [`TOKEN_TTL`]).
    pub fn create_token(
        &self,
        user_id: &str,
        username: &str,
        avatar: Option<&str>,
        role: &str,
    ) -> eyre::Result<String> {
        self.create_token_with_ttl(user_id, username, avatar, role, TOKEN_TTL)
    }

    fn create_token_with_ttl(
        &self,
        user_id: &str,
        username: &str,
        avatar: Option<&str>,
        role: &str,
        ttl_seconds: i64,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_seconds)).timestamp();
        let iat = now.timestamp();

        let claims = JwtClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            avatar: avatar.map(|s| s.to_string()),
            role: role.to_string(),
            exp,
            iat,
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-with-at-least-32-chars!!"))
    }

    #[test]
    fn test_token_roundtrip() {
        let auth = test_auth();
        let token = auth
            .create_token("user-1", "alice", Some("https://cdn/avatar.png"), "user")
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.avatar.as_deref(), Some("https://cdn/avatar.png"));
        assert_eq!(claims.role, "user");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = test_auth();
        let token = auth
            .create_token_with_ttl("user-1", "alice", None, "user", -60)
            .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = test_auth();
        let token = auth.create_token("user-1", "alice", None, "admin").unwrap();

        let other = JwtAuth::new(&JwtConfig::new("another-secret-with-32-characters!!"));
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth = test_auth();
        assert!(auth.verify_token("not.a.jwt").is_err());
    }
}
