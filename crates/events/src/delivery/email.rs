//! Outbound email.
//!
//! The outbox talks to a [`Mailer`]. In production that is [`EmailDelivery`],
//! an SMTP relay built from `SMTP_*` variables; without `SMTP_HOST` the
//! console uses [`LogMailer`] and approval emails only reach the log.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    #[error("Could not assemble email: {0}")]
    Message(String),
}

/// A plain-text email to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const DEFAULT_PORT: u16 = 587;
const DEFAULT_SENDER: &str = "EduHub <noreply@eduhub.local>";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    /// Mailbox used in the `From` header, e.g. `EduHub <noreply@eduhub.vn>`.
    pub sender: String,
    /// Username and password, only when both are set.
    pub credentials: Option<(String, String)>,
}

impl EmailConfig {
    /// Read `SMTP_HOST`, `SMTP_PORT` (587), `SMTP_FROM`, `SMTP_USER` and
    /// `SMTP_PASSWORD`. `None` when `SMTP_HOST` is unset or empty.
    pub fn from_env() -> Option<Self> {
        let host = non_empty("SMTP_HOST")?;
        let port = non_empty("SMTP_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let credentials = non_empty("SMTP_USER").zip(non_empty("SMTP_PASSWORD"));

        Some(Self {
            host,
            port,
            sender: non_empty("SMTP_FROM").unwrap_or_else(|| DEFAULT_SENDER.to_string()),
            credentials,
        })
    }
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// SMTP
// ---------------------------------------------------------------------------

/// SMTP relay over STARTTLS. The transport is built once per process.
pub struct EmailDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);
        if let Some((user, password)) = config.credentials {
            builder = builder.credentials(Credentials::new(user, password));
        }

        Ok(Self {
            transport: builder.build(),
            sender: config.sender.parse()?,
        })
    }

    fn compose(&self, message: &EmailMessage) -> Result<lettre::Message, EmailError> {
        lettre::Message::builder()
            .from(self.sender.clone())
            .to(message.to.parse()?)
            .subject(&message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| EmailError::Message(e.to_string()))
    }
}

#[async_trait]
impl Mailer for EmailDelivery {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let email = self.compose(message)?;
        self.transport.send(email).await?;
        tracing::info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

/// Used when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "SMTP not configured, email not sent",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to: to.into(),
            subject: "Hồ sơ đối tác đã được duyệt".into(),
            body: "Xin chào Công ty ABC".into(),
        }
    }

    fn delivery() -> EmailDelivery {
        EmailDelivery::new(EmailConfig {
            host: "localhost".into(),
            port: 2525,
            sender: DEFAULT_SENDER.into(),
            credentials: None,
        })
        .unwrap()
    }

    #[test]
    fn missing_host_disables_smtp() {
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[tokio::test]
    async fn compose_rejects_bad_recipient() {
        let err = delivery().compose(&message("khong-phai-email")).unwrap_err();
        assert!(matches!(err, EmailError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn compose_accepts_partner_contact() {
        assert!(delivery().compose(&message("contact@abc.vn")).is_ok());
    }

    #[test]
    fn bad_sender_is_rejected_at_construction() {
        let result = EmailDelivery::new(EmailConfig {
            host: "localhost".into(),
            port: 2525,
            sender: "not a mailbox".into(),
            credentials: None,
        });
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn log_mailer_accepts_everything() {
        assert!(LogMailer.send(&message("x@y.z")).await.is_ok());
    }
}
