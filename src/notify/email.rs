use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};
use std::time::Duration;

use super::{AlertDispatcher, DispatchFailure};
use crate::config::EmailConfig;

/// SMTP over implicit TLS (the `smtp_server:port` pair, usually 465),
/// authenticating as the sender.
pub struct EmailDispatcher {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailDispatcher {
    /// Bad addresses or host are startup errors, not dispatch failures.
    pub fn from_config(cfg: &EmailConfig, timeout: Duration) -> Result<Self> {
        let from: Mailbox = cfg
            .sender
            .parse()
            .with_context(|| format!("invalid email.sender {:?}", cfg.sender))?;
        let to: Mailbox = cfg
            .receiver
            .parse()
            .with_context(|| format!("invalid email.receiver {:?}", cfg.receiver))?;

        let creds = Credentials::new(cfg.sender.clone(), cfg.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_server)
            .with_context(|| format!("invalid email.smtp_server {:?}", cfg.smtp_server))?
            .port(cfg.port)
            .credentials(creds)
            .timeout(Some(timeout))
            .build();

        Ok(Self { mailer, from, to })
    }

    fn build(&self, subject: &str, body: &str) -> Result<Message, DispatchFailure> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| DispatchFailure::Build(e.to_string()))
    }
}

#[async_trait::async_trait]
impl AlertDispatcher for EmailDispatcher {
    async fn dispatch(&self, subject: &str, body: &str) -> Result<(), DispatchFailure> {
        let msg = self.build(subject, body)?;
        self.mailer
            .send(msg)
            .await
            .map_err(|e| DispatchFailure::Transport(e.to_string()))?;
        tracing::info!(target: "notify", to = %self.to, "alert email sent");
        Ok(())
    }
}
