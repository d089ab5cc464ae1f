//! HTTP client side of the chat UI: keeps the transcript and talks to the service.

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::models::ChatMessage;

/// Shown in place of an answer when the service cannot be reached.
pub const BACKEND_ERROR: &str = "⚠️ Backend error";

/// Shown when the service replies without an `answer` field.
pub const NO_ANSWER: &str = "No answer";

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

/// Lines requested by the logs view.
pub const LOG_VIEW_LIMIT: usize = 5;

#[derive(Serialize)]
struct AskBody<'a> {
    question: &'a str,
}

pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    transcript: Vec<ChatMessage>,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transcript: Vec::new(),
        }
    }

    /// The conversation so far, in order.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Record the user's turn, ask the service, record and return the reply.
    /// Transport failures become [`BACKEND_ERROR`] rather than an error.
    pub async fn send(&mut self, question: &str) -> &str {
        self.transcript.push(ChatMessage::user(question));

        let answer = match self.ask(question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::debug!("Ask request failed: {e:#}");
                BACKEND_ERROR.to_string()
            }
        };

        self.transcript.push(ChatMessage::assistant(answer));
        self.transcript
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    async fn ask(&self, question: &str) -> Result<String> {
        let resp = self
            .http
            .post(format!("{}/ask", self.base_url))
            .json(&AskBody { question })
            .send()
            .await?;

        // Error responses carry `error` instead of `answer`
        let body: serde_json::Value = resp.json().await?;
        Ok(body
            .get("answer")
            .and_then(|a| a.as_str())
            .unwrap_or(NO_ANSWER)
            .to_string())
    }

    /// Raw log tail from the service, or a description of why it could not be fetched.
    pub async fn fetch_logs(&self, limit: usize) -> String {
        let result = async {
            let resp = self
                .http
                .get(format!("{}/logs", self.base_url))
                .query(&[("limit", limit)])
                .send()
                .await?;
            resp.text().await
        }
        .await;

        match result {
            Ok(text) => text,
            Err(e) => format!("❌ Could not fetch logs: {e}"),
        }
    }
}
