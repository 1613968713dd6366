use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::MailConfig;

/// Hosted template names known to the mail provider.
pub mod templates {
    pub const SHIFT_CONFIRMED: &str = "shift-confirmed";
    pub const USER_PAYOUT: &str = "user-payout";
    pub const USER_BLOCKED: &str = "user-ban";
    pub const USER_UNBLOCKED: &str = "user-unban";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub template: String,
    pub data: Value,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, mail: &Mail) -> Result<()>;
}

/// Sends without waiting; a failed delivery is logged and otherwise ignored.
pub fn dispatch(notifier: Arc<dyn Notifier>, mail: Mail) {
    tokio::spawn(async move {
        match notifier.send(&mail).await {
            Ok(()) => log::info!("Sent '{}' mail to {}", mail.template, mail.to),
            Err(e) => log::warn!("Failed to send '{}' mail to {}: {}", mail.template, mail.to, e),
        }
    });
}

/// Delivers through the Mailgun messages API using stored templates.
pub struct MailgunNotifier {
    client: reqwest::Client,
    config: MailConfig,
}

impl MailgunNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    async fn send(&self, mail: &Mail) -> Result<()> {
        let url = format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.domain
        );
        let variables = serde_json::to_string(&mail.data)?;
        let form = [
            ("from", self.config.sender.as_str()),
            ("to", mail.to.as_str()),
            ("subject", mail.subject.as_str()),
            ("template", mail.template.as_str()),
            ("h:X-Mailgun-Variables", variables.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.config.api_key))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("mail provider answered {}", response.status()));
        }
        Ok(())
    }
}

/// Used when no provider is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, mail: &Mail) -> Result<()> {
        log::info!(
            "Mail delivery disabled, dropping '{}' to {}",
            mail.subject,
            mail.to
        );
        Ok(())
    }
}

/// Keeps every mail in memory; optionally fails each delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Mail>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, mail: &Mail) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail.clone());
        }
        if self.fail {
            return Err(anyhow!("delivery refused"));
        }
        Ok(())
    }
}

pub fn from_config(config: &MailConfig) -> Arc<dyn Notifier> {
    if config.is_enabled() {
        Arc::new(MailgunNotifier::new(config.clone()))
    } else {
        log::warn!("MAIL_DOMAIN/MAIL_API_KEY not set, outgoing mail is only logged");
        Arc::new(LogNotifier)
    }
}
