use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "https://medaiui.vercel.app",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Directory holding the persisted vector index
    pub index_dir: PathBuf,
    /// Name stamped on every log line and notification
    pub service_name: String,
    /// Number of passages retrieved per question
    pub top_k: usize,
    /// Lines kept in the in-memory log tail
    pub log_capacity: usize,
    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
    /// Generation model configuration
    pub llm: LlmConfig,
    /// Embedding model configuration
    pub embedding: EmbeddingConfig,
    /// External error notification
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "ollama" or "openai"
    pub provider: String,
    /// Base URL for the generation API
    pub base_url: String,
    /// Model name for generation
    pub chat_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama" or "openai"
    pub provider: String,
    pub base_url: String,
    /// Must match the model the index was built with
    pub model: String,
    pub api_key: Option<String>,
    /// Embedding vector dimension
    pub dim: usize,
}

/// Telegram notification channel. Both fields must be set for notifications to be sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    pub chat_id: Option<String>,
    pub bot_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            index_dir: PathBuf::from("./medical_index"),
            service_name: "medai".to_string(),
            top_k: crate::rag::DEFAULT_TOP_K,
            log_capacity: 1000,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            chat_model: "gemini-2.5-flash".to_string(),
            api_key: None,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            api_key: None,
            dim: 384,
        }
    }
}

impl NotifyConfig {
    /// The `(bot_token, chat_id)` pair, when both are configured.
    pub fn channel(&self) -> Option<(&str, &str)> {
        Some((self.bot_token.as_deref()?, self.chat_id.as_deref()?))
    }
}

impl Config {
    /// Build the configuration from the environment, loading `.env` first when present.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let mut config = Self::default();

        if let Ok(addr) = std::env::var("MEDAI_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(dir) = std::env::var("MEDAI_INDEX_DIR") {
            config.index_dir = PathBuf::from(dir);
        }
        if let Ok(name) = std::env::var("MEDAI_SERVICE_NAME") {
            config.service_name = name;
        }
        if let Ok(val) = std::env::var("MEDAI_TOP_K") {
            if let Ok(v) = val.parse::<usize>() {
                config.top_k = v.max(1);
            }
        }
        if let Ok(val) = std::env::var("MEDAI_LOG_CAPACITY") {
            if let Ok(v) = val.parse::<usize>() {
                config.log_capacity = v.max(1);
            }
        }
        if let Ok(val) = std::env::var("MEDAI_CORS_ORIGINS") {
            config.cors_origins = parse_origins(&val);
        }

        // Generation model
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY")) {
            config.llm.api_key = Some(key);
        }

        // Embedding model
        if let Ok(provider) = std::env::var("EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }
        if let Ok(url) = std::env::var("EMBEDDING_BASE_URL") {
            config.embedding.base_url = url;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(key) = std::env::var("EMBEDDING_API_KEY") {
            config.embedding.api_key = Some(key);
        }
        if let Ok(dim) = std::env::var("EMBEDDING_DIM") {
            if let Ok(d) = dim.parse() {
                config.embedding.dim = d;
            }
        }

        // Notification channel; absence only disables notifications
        if let Ok(id) = std::env::var("CHATID") {
            if !id.trim().is_empty() {
                config.notify.chat_id = Some(id);
            }
        }
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            if !token.trim().is_empty() {
                config.notify.bot_token = Some(token);
            }
        }

        config
    }

    pub fn index_file(&self) -> PathBuf {
        self.index_dir.join(crate::index::INDEX_FILE)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
