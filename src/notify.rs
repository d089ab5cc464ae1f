use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use crate::config::NotifyConfig;

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Upper bound on one sendMessage call. Error responses wait on it.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram caps message text at 4096 characters.
const MAX_MESSAGE_CHARS: usize = 4000;

/// Out-of-band channel for errors that need human attention.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, service: &str, message: &str) -> Result<()>;
}

/// Used when no notification channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _service: &str, _message: &str) -> Result<()> {
        Ok(())
    }
}

/// Sends notifications to a Telegram chat through the Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: String,
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, bot_token: String, chat_id: String) -> Self {
        Self {
            client,
            api_base: TELEGRAM_API.to_string(),
            bot_token,
            chat_id,
            timeout: NOTIFY_TIMEOUT,
        }
    }

    /// Point the notifier at a different Bot API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, service: &str, message: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let req = SendMessage {
            chat_id: &self.chat_id,
            text: format_alert(service, message),
        };

        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&req)
            .send()
            .await
            .context("Failed to call Telegram sendMessage")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API returned {status}: {body}");
        }
        Ok(())
    }
}

/// Pick the notifier for the configured channel. A missing channel disables
/// notification without failing startup.
pub fn from_config(client: &reqwest::Client, config: &NotifyConfig) -> Arc<dyn Notifier> {
    match config.channel() {
        Some((token, chat_id)) => {
            tracing::info!("Error notifications enabled for chat {chat_id}");
            Arc::new(TelegramNotifier::new(
                client.clone(),
                token.to_string(),
                chat_id.to_string(),
            ))
        }
        None => {
            tracing::info!("No notification channel configured; error notifications disabled");
            Arc::new(NoopNotifier)
        }
    }
}

fn format_alert(service: &str, message: &str) -> String {
    let text = format!("[{service}] ERROR: {message}");
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text;
    }
    let mut truncated: String = text.chars().take(MAX_MESSAGE_CHARS).collect();
    truncated.push('…');
    truncated
}
