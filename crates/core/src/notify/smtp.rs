use crate::config::Settings;
use crate::notify::{Digest, Notifier};
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// A fully addressed message, resolved from settings at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn addressed(settings: &Settings, digest: &Digest) -> Result<Self> {
        Ok(Self {
            from: settings.require_email_address()?.to_string(),
            to: settings.require_email_to()?.to_string(),
            subject: digest.subject.clone(),
            body: digest.body.clone(),
        })
    }

    pub fn to_lettre(&self) -> Result<Message> {
        let from = self
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("invalid sender address {:?}", self.from))?;
        let to = self
            .to
            .parse::<Mailbox>()
            .with_context(|| format!("invalid recipient address {:?}", self.to))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())
            .context("failed to build email message")
    }
}

/// STARTTLS submission with password auth, one connection per message.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    settings: Settings,
}

impl SmtpNotifier {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let username = self.settings.require_email_address()?.to_string();
        let password = self.settings.require_email_password()?.to_string();

        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.smtp_host)
                .with_context(|| format!("invalid SMTP relay {}", self.settings.smtp_host))?
                .port(self.settings.smtp_port)
                .credentials(Credentials::new(username, password))
                .timeout(Some(Duration::from_secs(self.settings.http_timeout_secs)))
                .build();
        Ok(transport)
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    fn channel(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, digest: &Digest) -> Result<()> {
        let message = EmailMessage::addressed(&self.settings, digest)?;
        tracing::info!(from = %message.from, to = %message.to, "sending email");

        let mail = message.to_lettre()?;
        let transport = self.transport()?;

        tracing::debug!(host = %self.settings.smtp_host, port = self.settings.smtp_port, "logging in to SMTP relay");
        transport
            .send(mail)
            .await
            .with_context(|| format!("SMTP send via {} failed", self.settings.smtp_host))?;
        Ok(())
    }
}
