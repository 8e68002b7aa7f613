//! Outbound email channel.
//!
//! Used by background tasks for account verification mail. The
//! [`EmailProvider`] trait keeps the SMTP transport swappable in tests.

pub mod smtp;
pub mod templates;

pub use smtp::{SmtpConfig, SmtpProvider};

use crate::error::NotificationResult;
use async_trait::async_trait;

/// Email content ready for sending.
#[derive(Debug, Clone, Default)]
pub struct EmailContent {
    /// Recipient email address.
    pub to_email: String,
    /// Recipient name.
    pub to_name: String,
    /// Email subject.
    pub subject: String,
    /// HTML body content.
    pub html_body: String,
    /// Plain text body content.
    pub text_body: String,
}

/// Trait for email sending providers.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email.
    async fn send(&self, email: &EmailContent) -> NotificationResult<()>;

    /// Get the provider name for logging.
    fn name(&self) -> &'static str;
}
