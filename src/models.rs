use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A chunk of source text together with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    pub content: String,
    pub embedding: Vec<f32>,
}

/// A passage returned by a similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct PassageHit {
    pub content: String,
    pub score: f32,
}

/// Ask request. The field is optional so a missing question can be reported
/// with the service's own error payload instead of a deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
}

/// Ask response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
}

/// Error payload shared by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// GET / response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
}

/// GET /logs query string
#[derive(Debug, Clone, Deserialize)]
pub struct LogsQuery {
    #[serde(default = "default_logs_limit")]
    pub limit: usize,
}

fn default_logs_limit() -> usize {
    50
}

impl Default for LogsQuery {
    fn default() -> Self {
        Self {
            limit: default_logs_limit(),
        }
    }
}

/// A single chat turn (user or assistant)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}
