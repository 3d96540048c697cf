//! SMTP email notifier using lettre

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::domain::notifier::{EmailMessage, EmailNotifier};
use crate::error::{AuthError, AuthResult};

/// SMTP transport configuration
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub use_tls: bool,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

/// SMTP email notifier
pub struct SmtpEmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailNotifier {
    pub fn new(config: &SmtpConfig) -> AuthResult<Self> {
        let transport = if config.use_tls {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| AuthError::Email(format!("Failed to create SMTP relay: {e}")))?
                .credentials(creds)
                .port(config.port)
                .build()
        } else if !config.username.is_empty() {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .credentials(creds)
                .port(config.port)
                .build()
        } else {
            // No auth (Mailpit/Mailhog)
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        };

        let from = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| AuthError::Email(format!("Invalid from address: {e}")))?;

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &EmailMessage) -> AuthResult<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(&email.subject);

        for to in &email.to {
            builder = builder.to(parse_mailbox(to)?);
        }
        for cc in &email.cc {
            builder = builder.cc(parse_mailbox(cc)?);
        }
        for bcc in &email.bcc {
            builder = builder.bcc(parse_mailbox(bcc)?);
        }

        builder
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| AuthError::Email(format!("Failed to build message: {e}")))
    }
}

fn parse_mailbox(address: &str) -> AuthResult<Mailbox> {
    address
        .parse()
        .map_err(|e| AuthError::Email(format!("Invalid recipient address: {e}")))
}

impl EmailNotifier for SmtpEmailNotifier {
    async fn send(&self, email: &EmailMessage) -> AuthResult<()> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthError::Email(format!("Failed to send email via SMTP: {e}")))?;

        tracing::info!(subject = %email.subject, recipients = email.to.len(), "Email sent");
        Ok(())
    }
}
