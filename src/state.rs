use std::sync::Arc;

use crate::config::Config;
use crate::index::VectorIndex;
use crate::llm::{Embedder, Generator, HttpEmbedder, HttpGenerator};
use crate::logsink::LogSink;
use crate::notify::{self, Notifier};
use crate::rag::RagPipeline;

/// Shared application state. Built once at startup and never mutated;
/// the log sink's tail buffer is the only interior mutability.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub rag: RagPipeline,
    pub logger: Arc<LogSink>,
}

impl AppState {
    /// Load the index and wire up the HTTP model clients and notifier.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let index = VectorIndex::load_for_model(
            &config.index_dir,
            &config.embedding.model,
            config.embedding.dim,
        )?;
        tracing::info!(
            "Loaded {} passages from {}",
            index.len(),
            config.index_dir.display()
        );

        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let embedder = Arc::new(HttpEmbedder::new(
            http_client.clone(),
            config.embedding.clone(),
        ));
        let generator = Arc::new(HttpGenerator::new(http_client.clone(), config.llm.clone()));
        let notifier = notify::from_config(&http_client, &config.notify);

        Ok(Self::from_parts(config, index, embedder, generator, notifier))
    }

    /// Assemble state from already constructed collaborators.
    pub fn from_parts(
        config: Config,
        index: VectorIndex,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let logger = LogSink::new(config.service_name.clone(), config.log_capacity, notifier);
        let rag = RagPipeline::new(Arc::new(index), embedder, generator, config.top_k);

        Self {
            config: Arc::new(config),
            rag,
            logger: Arc::new(logger),
        }
    }
}
