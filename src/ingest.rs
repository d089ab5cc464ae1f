//! Offline index build: load document → split → embed → persist.
//!
//! Any failure aborts the build; a partially embedded index is never written.

use std::path::Path;

use anyhow::{Context, Result};

use crate::chunking::{load_document, TextSplitter};
use crate::index::VectorIndex;
use crate::llm::Embedder;

/// Passages sent to the embedding client per call.
const EMBED_BATCH: usize = 64;

/// Split `text` and embed every passage into a new in-memory index.
pub async fn build_index(
    text: &str,
    splitter: &TextSplitter,
    embedder: &dyn Embedder,
) -> Result<VectorIndex> {
    let chunks = splitter.split_text(text);
    if chunks.is_empty() {
        anyhow::bail!("Document produced no passages");
    }
    tracing::info!(
        "Split document into {} passages (size {}, overlap {})",
        chunks.len(),
        splitter.chunk_size(),
        splitter.chunk_overlap()
    );

    let mut index: Option<VectorIndex> = None;
    for (batch_no, batch) in chunks.chunks(EMBED_BATCH).enumerate() {
        let embeddings = embedder
            .embed(batch)
            .await
            .with_context(|| format!("Failed to embed passage batch {batch_no}"))?;

        for (content, embedding) in batch.iter().zip(embeddings) {
            let index =
                index.get_or_insert_with(|| VectorIndex::new(embedder.model(), embedding.len()));
            index.push(content.clone(), embedding)?;
        }

        let done = (batch_no * EMBED_BATCH + batch.len()).min(chunks.len());
        tracing::info!("Embedded {done}/{} passages", chunks.len());
    }

    index.context("Embedding client returned no vectors")
}

/// Build the index for the document at `input` and save it under `index_dir`.
pub async fn run(
    input: &Path,
    index_dir: &Path,
    splitter: &TextSplitter,
    embedder: &dyn Embedder,
) -> Result<VectorIndex> {
    tracing::info!("Loading {}", input.display());
    let text = load_document(input)?;
    tracing::info!("Loaded {} characters", text.chars().count());

    let index = build_index(&text, splitter, embedder).await?;
    index.save(index_dir)?;
    tracing::info!(
        "Wrote {} passages ({}-d, model {}) to {}",
        index.len(),
        index.dim(),
        index.embedding_model(),
        index_dir.display()
    );
    Ok(index)
}
