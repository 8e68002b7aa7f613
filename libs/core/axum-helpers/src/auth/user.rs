//! Request extractors for the authenticated user.

use super::jwt::JwtClaims;
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Role string carried in admin tokens
pub const ADMIN_ROLE: &str = "admin";

/// Extractor for the authenticated user's claims.
///
/// Requires `jwt_auth_middleware` to have run on the route; rejects
/// with 401 when no claims are present in the request extensions.
///
/// # Example
/// ```ignore
/// async fn my_listings(AuthUser(user): AuthUser) -> impl IntoResponse {
///     format!("listings for {}", user.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Extractor that additionally requires the `admin` role.
///
/// Rejects with 401 when unauthenticated and 403 when the caller
/// is authenticated but not an admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub JwtClaims);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        if claims.role != ADMIN_ROLE {
            return Err(AppError::Forbidden(
                "Admin privileges required".to_string(),
            ));
        }

        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn claims(role: &str) -> JwtClaims {
        JwtClaims {
            sub: "user-1".to_string(),
            username: "alice".to_string(),
            avatar: None,
            role: role.to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[tokio::test]
    async fn test_auth_user_present() {
        let request = Request::builder()
            .extension(claims("user"))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.0.sub, "user-1");
    }

    #[tokio::test]
    async fn test_auth_user_missing() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_admin_user_accepts_admin() {
        let request = Request::builder()
            .extension(claims(ADMIN_ROLE))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        assert!(AdminUser::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_user_rejects_regular_user() {
        let request = Request::builder()
            .extension(claims("user"))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let result = AdminUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
