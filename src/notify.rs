//! Outbound email alerts.
//!
//! Sends the formatted report to the configured distribution list over
//! SMTPS. Credentials come from the environment (env-var names are in the
//! config); when either is missing the caller degrades to a console-only
//! report instead of failing the run.

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, Secret, SecretString};
use tracing::info;

use crate::config::AlertsConfig;

/// SMTP mailer for new-data alerts.
pub struct Mailer {
    cfg: AlertsConfig,
    user: String,
    password: SecretString,
}

impl Mailer {
    /// Build a mailer from env credentials. `None` when either credential
    /// is unset — the console-only degradation path.
    pub fn from_env(cfg: &AlertsConfig) -> Option<Self> {
        let user = std::env::var(&cfg.user_env).ok()?;
        let password = std::env::var(&cfg.password_env).ok().map(Secret::new)?;
        Some(Self { cfg: cfg.clone(), user, password })
    }

    /// Send one HTML alert to the full distribution list.
    pub async fn send(&self, subject: &str, html_body: &str) -> Result<()> {
        let from: Mailbox = format!("{} <{}>", self.cfg.from_name, self.user)
            .parse()
            .with_context(|| format!("Invalid sender address: {}", self.user))?;

        let mut builder = Message::builder().from(from).subject(subject);
        for recipient in &self.cfg.recipients {
            let to: Mailbox = recipient
                .parse()
                .with_context(|| format!("Invalid recipient address: {recipient}"))?;
            builder = builder.to(to);
        }

        let message = builder
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .context("Failed to build alert message")?;

        let credentials = Credentials::new(
            self.user.clone(),
            self.password.expose_secret().to_string(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.cfg.smtp_host)
            .with_context(|| format!("Failed to configure SMTP relay {}", self.cfg.smtp_host))?
            .credentials(credentials)
            .build();

        transport
            .send(message)
            .await
            .context("SMTP send failed")?;

        info!(recipients = self.cfg.recipients.len(), "Alert email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
