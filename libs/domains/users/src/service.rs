//! User service - accounts, credentials, favorites and verification.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use axum_helpers::JwtAuth;
use chrono::{Duration, Utc};
use rand::{Rng, distributions::Alphanumeric};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{AuthResponse, OAuthLogin, PublicUser, SignIn, SignUp, UpdateProfile, User};
use crate::repository::{ProfileChanges, UserRepository};

/// Verification links stay valid for one day.
const VERIFICATION_TTL_HOURS: i64 = 24;

/// Hands verification emails to the background task runner; the HTTP
/// caller never waits on SMTP.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    async fn queue_verification(&self, email: &str, username: &str, token: &str);
}

/// User service providing account business logic.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    jwt: Arc<JwtAuth>,
    mailer: Arc<dyn VerificationMailer>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, jwt: Arc<JwtAuth>, mailer: Arc<dyn VerificationMailer>) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
            mailer,
        }
    }

    fn hash_password(password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::Hash(e.to_string()))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    fn issue_token(&self, user: &User) -> UserResult<String> {
        self.jwt
            .create_token(
                &user.id.to_string(),
                &user.username,
                user.avatar.as_deref(),
                user.role.as_str(),
            )
            .map_err(|e| UserError::Token(e.to_string()))
    }

    fn auth_response(&self, user: User) -> UserResult<AuthResponse> {
        let token = self.issue_token(&user)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Register a new account. Duplicates are reported as 400 in a fixed
    /// order: email first, then username.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn signup(&self, input: SignUp) -> UserResult<AuthResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let email = input.email.trim().to_lowercase();
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(UserError::SignupDuplicate("email"));
        }
        if self
            .repository
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(UserError::SignupDuplicate("username"));
        }

        let hash = Self::hash_password(&input.password)?;
        let user = self
            .repository
            .insert(User::new(input.username, email, hash))
            .await?;
        self.auth_response(user)
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn signin(&self, input: SignIn) -> UserResult<AuthResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let email = input.email.trim().to_lowercase();
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !Self::verify_password(&input.password, &user.password_hash) {
            return Err(UserError::InvalidCredentials);
        }
        self.auth_response(user)
    }

    /// OAuth-style login-or-register: a known email signs in, an unknown
    /// one gets an account with a generated password and a username
    /// derived from the display name.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login_or_register(&self, input: OAuthLogin) -> UserResult<AuthResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let email = input.email.trim().to_lowercase();
        if let Some(user) = self.repository.find_by_email(&email).await? {
            return self.auth_response(user);
        }

        let password: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        let hash = Self::hash_password(&password)?;

        let mut user = User::new(derived_username(&input.display_name), email, hash);
        user.avatar = input.avatar;
        let user = self.repository.insert(user).await?;
        self.auth_response(user)
    }

    #[instrument(skip(self, input))]
    pub async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> UserResult<PublicUser> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let changes = ProfileChanges {
            username: input.username,
            email: input.email.map(|e| e.trim().to_lowercase()),
            password_hash: input
                .password
                .as_deref()
                .map(Self::hash_password)
                .transpose()?,
            avatar: input.avatar,
        };

        self.repository
            .update_profile(id, &changes)
            .await?
            .map(PublicUser::from)
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip(self, key))]
    pub async fn add_favorite(&self, id: Uuid, key: &str) -> UserResult<()> {
        if self.repository.add_favorite(id, key).await? {
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }

    #[instrument(skip(self, key))]
    pub async fn remove_favorite(&self, id: Uuid, key: &str) -> UserResult<()> {
        if self.repository.remove_favorite(id, key).await? {
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_account(&self, id: Uuid) -> UserResult<()> {
        if self.repository.delete(id).await? {
            tracing::info!(user_id = %id, "Account deleted");
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, id: Uuid) -> UserResult<PublicUser> {
        self.repository
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or(UserError::NotFound)
    }

    /// Store a fresh verification token and queue the email.
    #[instrument(skip(self))]
    pub async fn request_verification(&self, id: Uuid) -> UserResult<()> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::hours(VERIFICATION_TTL_HOURS);
        self.repository.set_verification(id, &token, expires_at).await?;
        self.mailer
            .queue_verification(&user.email, &user.username, &token)
            .await;
        Ok(())
    }

    #[instrument(skip(self, token))]
    pub async fn confirm_verification(&self, token: &str) -> UserResult<PublicUser> {
        let user = self
            .repository
            .find_by_verification_token(token)
            .await?
            .ok_or(UserError::InvalidVerificationToken)?;

        match user.verification_expires_at {
            Some(expires_at) if expires_at > Utc::now() => {}
            _ => return Err(UserError::InvalidVerificationToken),
        }

        self.repository.mark_verified(user.id).await?;
        let mut verified = user;
        verified.is_verified = true;
        Ok(verified.into())
    }

    #[instrument(skip(self, reason))]
    pub async fn ban(&self, id: Uuid, reason: Option<&str>) -> UserResult<()> {
        if self.repository.set_ban(id, true, reason).await? {
            tracing::info!(user_id = %id, "User banned");
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }

    #[instrument(skip(self))]
    pub async fn unban(&self, id: Uuid) -> UserResult<()> {
        if self.repository.set_ban(id, false, None).await? {
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }

    /// Ban check used by the write-guard middleware.
    pub async fn is_banned(&self, id: Uuid) -> UserResult<bool> {
        Ok(self
            .repository
            .find_by_id(id)
            .await?
            .map(|user| user.is_banned)
            .unwrap_or(false))
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            jwt: Arc::clone(&self.jwt),
            mailer: Arc::clone(&self.mailer),
        }
    }
}

/// Lowercased alphanumeric display name plus a 4-digit suffix, so
/// "Jane Doe" becomes something like "janedoe4821".
fn derived_username(display_name: &str) -> String {
    let base: String = display_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let base = if base.is_empty() { "user".to_string() } else { base };
    let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
    format!("{base}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use axum_helpers::JwtConfig;

    fn jwt() -> Arc<JwtAuth> {
        Arc::new(JwtAuth::new(&JwtConfig::new(
            "test-secret-with-at-least-32-chars!!",
        )))
    }

    fn service(repo: MockUserRepository) -> UserService<MockUserRepository> {
        let mut mailer = MockVerificationMailer::new();
        mailer.expect_queue_verification().return_const(());
        UserService::new(repo, jwt(), Arc::new(mailer))
    }

    fn signup_input() -> SignUp {
        SignUp {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_reports_email_duplicate_first() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|email| {
            Ok(Some(User::new(
                "taken".to_string(),
                email.to_string(),
                "hash".to_string(),
            )))
        });

        let result = service(repo).signup(signup_input()).await;
        assert!(matches!(result, Err(UserError::SignupDuplicate("email"))));
    }

    #[tokio::test]
    async fn test_signup_reports_username_duplicate_second() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_find_by_username().returning(|name| {
            Ok(Some(User::new(
                name.to_string(),
                "other@example.com".to_string(),
                "hash".to_string(),
            )))
        });

        let result = service(repo).signup(signup_input()).await;
        assert!(matches!(
            result,
            Err(UserError::SignupDuplicate("username"))
        ));
    }

    #[tokio::test]
    async fn test_signup_lowercases_email_and_issues_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_insert().returning(Ok);

        let mut input = signup_input();
        input.email = "Alice@Example.COM".to_string();
        let response = service(repo).signup(input).await.unwrap();
        assert_eq!(response.user.email, "alice@example.com");
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn test_signin_rejects_wrong_password() {
        let hash = UserService::<MockUserRepository>::hash_password("correct horse").unwrap();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            Ok(Some(User::new(
                "alice".to_string(),
                email.to_string(),
                hash.clone(),
            )))
        });

        let result = service(repo)
            .signin(SignIn {
                email: "alice@example.com".to_string(),
                password: "battery staple".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_or_register_creates_account_for_new_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert().returning(Ok);

        let response = service(repo)
            .login_or_register(OAuthLogin {
                email: "jane@example.com".to_string(),
                display_name: "Jane Doe".to_string(),
                avatar: Some("pic".to_string()),
            })
            .await
            .unwrap();

        assert!(response.user.username.starts_with("janedoe"));
        assert_eq!(response.user.avatar.as_deref(), Some("pic"));
    }

    #[tokio::test]
    async fn test_confirm_verification_rejects_expired_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_verification_token().returning(|token| {
            let mut user = User::new(
                "alice".to_string(),
                "alice@example.com".to_string(),
                "hash".to_string(),
            );
            user.verification_token = Some(token.to_string());
            user.verification_expires_at = Some(Utc::now() - Duration::hours(1));
            Ok(Some(user))
        });

        let result = service(repo).confirm_verification("token").await;
        assert!(matches!(result, Err(UserError::InvalidVerificationToken)));
    }

    #[tokio::test]
    async fn test_add_favorite_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_add_favorite().returning(|_, _| Ok(false));

        let result = service(repo)
            .add_favorite(Uuid::now_v7(), "some-key")
            .await;
        assert!(matches!(result, Err(UserError::NotFound)));
    }

    #[test]
    fn test_derived_username_strips_and_suffixes() {
        let name = derived_username("Jane Doe!");
        assert!(name.starts_with("janedoe"));
        assert_eq!(name.len(), "janedoe".len() + 4);

        let fallback = derived_username("☃☃☃");
        assert!(fallback.starts_with("user"));
    }
}
