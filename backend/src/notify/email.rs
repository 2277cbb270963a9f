//! Email sink via SMTP.
//!
//! Wraps the `lettre` async SMTP transport. The transport is built once from
//! [`EmailConfig`]; a message goes to every configured recipient.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::summary::SUMMARY_TITLE;
use super::{NotificationError, NotificationSink};
use crate::config::EmailConfig;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

pub struct EmailSink {
    from: Mailbox,
    to: Vec<Mailbox>,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailSink {
    /// Parse addresses and build the transport; nothing is sent yet.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from_address.parse()?;
        let to = config
            .recipients
            .iter()
            .map(|r| r.parse::<Mailbox>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from,
            to,
            mailer: builder.build(),
        })
    }

    /// Assemble the plain-text message for `summary`.
    pub fn message(&self, summary: &str) -> Result<Message, EmailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(SUMMARY_TITLE)
            .header(ContentType::TEXT_PLAIN);
        for to in &self.to {
            builder = builder.to(to.clone());
        }
        builder
            .body(summary.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl NotificationSink for EmailSink {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, summary: &str) -> Result<(), NotificationError> {
        let message = self.message(summary)?;
        self.mailer.send(message).await.map_err(EmailError::from)?;
        tracing::info!(sink = self.name(), recipients = self.to.len(), "Notification email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            from_address: "intake@example.com".to_string(),
            smtp_user: None,
            smtp_password: None,
            recipients: vec!["sec@example.com".to_string(), "ops@example.com".to_string()],
        }
    }

    #[test]
    fn message_addresses_every_recipient() {
        let sink = EmailSink::new(&config()).unwrap();
        let message = sink.message("body text").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("sec@example.com"));
        assert!(raw.contains("ops@example.com"));
        assert!(raw.contains(SUMMARY_TITLE));
    }

    #[test]
    fn bad_recipient_is_rejected_at_construction() {
        let mut c = config();
        c.recipients.push("not-an-email".to_string());
        assert!(matches!(EmailSink::new(&c), Err(EmailError::Address(_))));
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
