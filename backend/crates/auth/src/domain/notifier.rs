//! Email Notifier Port

use crate::error::AuthResult;

/// An outbound HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub html_body: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
}

impl EmailMessage {
    pub fn to_one(recipient: impl Into<String>, subject: impl Into<String>, html_body: String) -> Self {
        Self {
            subject: subject.into(),
            html_body,
            to: vec![recipient.into()],
            cc: Vec::new(),
            bcc: Vec::new(),
        }
    }
}

#[trait_variant::make(EmailNotifier: Send)]
pub trait LocalEmailNotifier {
    /// Deliver `message`. Any transport failure is `AuthError::Email`.
    async fn send(&self, message: &EmailMessage) -> AuthResult<()>;
}
