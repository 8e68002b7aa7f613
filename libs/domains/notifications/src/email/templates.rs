//! Email templates.
//!
//! Plain `format!` templates; subjects and copy are deliberately short
//! since clients render the in-app notification for anything rich.

use super::EmailContent;

/// Account verification email with a signed confirmation link.
pub fn verification_email(to_email: &str, username: &str, verify_url: &str) -> EmailContent {
    EmailContent {
        to_email: to_email.to_string(),
        to_name: username.to_string(),
        subject: "Verify your email address".to_string(),
        text_body: format!(
            "Hi {username},\n\n\
             Please confirm your email address by opening the link below:\n\n\
             {verify_url}\n\n\
             If you did not create an account, you can ignore this message.\n"
        ),
        html_body: format!(
            "<p>Hi {username},</p>\
             <p>Please confirm your email address by clicking the link below:</p>\
             <p><a href=\"{verify_url}\">Verify email</a></p>\
             <p>If you did not create an account, you can ignore this message.</p>"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_email_contains_link() {
        let email = verification_email("a@b.c", "alice", "https://app/verify?token=t");
        assert_eq!(email.to_email, "a@b.c");
        assert!(email.text_body.contains("https://app/verify?token=t"));
        assert!(email.html_body.contains("https://app/verify?token=t"));
    }
}
