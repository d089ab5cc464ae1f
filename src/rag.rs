//! Retrieval-augmented answering: embed → retrieve top-k → fill prompt → generate.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::index::VectorIndex;
use crate::llm::{Embedder, Generator};
use crate::models::PassageHit;

pub const DEFAULT_TOP_K: usize = 4;

const PROMPT_PREAMBLE: &str = "You are a helpful medical assistant.
Answer ONLY using the provided context.
If the context does not contain the answer, reply: \"I don't know.\"";

/// Join retrieved passages in rank order, separated by blank lines.
pub fn format_context(hits: &[PassageHit]) -> String {
    hits.iter()
        .map(|h| h.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the fixed prompt template. Context and question are inserted verbatim.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!("{PROMPT_PREAMBLE}\n\nContext:\n{context}\n\nQuestion: {question}\n")
}

/// The answering chain shared by all requests. Immutable after construction.
#[derive(Clone)]
pub struct RagPipeline {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            generator,
            top_k: top_k.max(1),
        }
    }

    /// Retrieve the passages nearest to `question`.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<PassageHit>> {
        let query_embedding = self
            .embedder
            .embed_one(question)
            .await
            .context("Failed to embed question")?;
        self.index.search(&query_embedding, self.top_k)
    }

    /// Answer `question` from the indexed passages. The model output is returned verbatim.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let hits = self.retrieve(question).await?;
        tracing::debug!(
            "Retrieved {} passages (best score {:.3})",
            hits.len(),
            hits.first().map(|h| h.score).unwrap_or_default()
        );

        let context = format_context(&hits);
        let prompt = build_prompt(&context, question);
        self.generator.generate(&prompt).await
    }
}
