//! Remote model clients: embeddings for retrieval, text generation for answers.

pub mod embeddings;
pub mod generate;

use anyhow::{Context, Result};
use async_trait::async_trait;

pub use embeddings::HttpEmbedder;
pub use generate::HttpGenerator;

/// Turns text into fixed-length vectors. The same implementation and model
/// must be used when building the index and when embedding questions.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model identifier recorded in the index manifest.
    fn model(&self) -> &str;

    /// Embed a batch of texts; the result is parallel with `texts`.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .context("No embedding returned")
    }
}

/// Produces a completion for a fully rendered prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
