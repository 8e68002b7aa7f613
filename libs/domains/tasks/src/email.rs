//! Handler for the verification-email task.

use async_trait::async_trait;
use domain_notifications::email::{EmailProvider, templates};

use crate::error::{TaskError, TaskResult};
use crate::models::{SEND_VERIFICATION_EMAIL, VerificationEmailPayload};
use crate::worker::TaskHandler;

/// Sends account verification emails through any [`EmailProvider`].
pub struct VerificationEmailHandler<P: EmailProvider> {
    provider: P,
    /// Public base URL of the API, used to build the verification link.
    base_url: String,
}

impl<P: EmailProvider> VerificationEmailHandler<P> {
    pub fn new(provider: P, base_url: impl Into<String>) -> Self {
        Self {
            provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl<P: EmailProvider> TaskHandler for VerificationEmailHandler<P> {
    fn name(&self) -> &'static str {
        SEND_VERIFICATION_EMAIL
    }

    async fn run(&self, payload: &serde_json::Value) -> TaskResult<()> {
        let payload: VerificationEmailPayload = serde_json::from_value(payload.clone())?;
        let verify_url = format!("{}/api/users/verify/{}", self.base_url, payload.token);
        let email = templates::verification_email(&payload.to, &payload.username, &verify_url);
        self.provider
            .send(&email)
            .await
            .map_err(|e| TaskError::Execution(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_notifications::email::EmailContent;
    use domain_notifications::error::NotificationResult;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingProvider {
        sent: Mutex<Vec<EmailContent>>,
    }

    #[async_trait]
    impl EmailProvider for CapturingProvider {
        async fn send(&self, email: &EmailContent) -> NotificationResult<()> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "capturing"
        }
    }

    #[tokio::test]
    async fn test_builds_verification_link() {
        let handler = VerificationEmailHandler::new(
            CapturingProvider::default(),
            "https://bazaar.example.com/",
        );

        handler
            .run(&json!({
                "to": "alice@example.com",
                "username": "alice",
                "token": "tok-123",
            }))
            .await
            .unwrap();

        let sent = handler.provider.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(
            sent[0]
                .html_body
                .contains("https://bazaar.example.com/api/users/verify/tok-123")
        );
    }

    #[tokio::test]
    async fn test_rejects_malformed_payload() {
        let handler = VerificationEmailHandler::new(CapturingProvider::default(), "http://x");
        let result = handler.run(&json!({ "to": "alice@example.com" })).await;
        assert!(matches!(result, Err(TaskError::Payload(_))));
    }
}
