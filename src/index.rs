use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{Passage, PassageHit};

/// File name of the persisted index inside the index directory.
pub const INDEX_FILE: &str = "index.json";

/// On-disk layout: the manifest fields followed by every passage.
#[derive(Serialize, Deserialize)]
struct IndexFile {
    embedding_model: String,
    dim: usize,
    passages: Vec<Passage>,
}

/// In-memory vector index with disk persistence and cosine similarity search.
///
/// Built once by the chunker and loaded once by the service; never mutated
/// while serving.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    embedding_model: String,
    dim: usize,
    passages: Vec<Passage>,
}

impl VectorIndex {
    pub fn new(embedding_model: impl Into<String>, dim: usize) -> Self {
        Self {
            embedding_model: embedding_model.into(),
            dim,
            passages: Vec::new(),
        }
    }

    /// Add a passage. Its embedding must have the index dimension.
    pub fn push(&mut self, content: impl Into<String>, embedding: Vec<f32>) -> Result<()> {
        if embedding.len() != self.dim {
            anyhow::bail!(
                "Embedding dimension {} does not match index dimension {}",
                embedding.len(),
                self.dim
            );
        }
        self.passages.push(Passage {
            content: content.into(),
            embedding,
        });
        Ok(())
    }

    /// Read an index directory written by [`VectorIndex::save`].
    pub fn load(index_dir: &Path) -> Result<Self> {
        let path = index_dir.join(INDEX_FILE);
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read vector index {}", path.display()))?;
        let file: IndexFile = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse vector index {}", path.display()))?;

        if let Some(bad) = file.passages.iter().find(|p| p.embedding.len() != file.dim) {
            anyhow::bail!(
                "Corrupt index: passage embedding has dimension {} but manifest says {}",
                bad.embedding.len(),
                file.dim
            );
        }

        Ok(Self {
            embedding_model: file.embedding_model,
            dim: file.dim,
            passages: file.passages,
        })
    }

    /// Load an index and check it was built with `embedding_model` producing
    /// `dim`-dimensional vectors. Similarity scores against vectors from
    /// another model are meaningless.
    pub fn load_for_model(index_dir: &Path, embedding_model: &str, dim: usize) -> Result<Self> {
        let index = Self::load(index_dir)?;
        if index.embedding_model != embedding_model {
            anyhow::bail!(
                "Index at {} was built with embedding model '{}' but the service is configured for '{}'; rebuild the index",
                index_dir.display(),
                index.embedding_model,
                embedding_model
            );
        }
        if index.dim != dim {
            anyhow::bail!(
                "Index at {} holds {}-dimensional embeddings but EMBEDDING_DIM is {}; rebuild the index or fix the setting",
                index_dir.display(),
                index.dim,
                dim
            );
        }
        Ok(index)
    }

    /// Persist to `<index_dir>/index.json` (atomic write via temp file + rename).
    pub fn save(&self, index_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(index_dir)
            .with_context(|| format!("Failed to create {}", index_dir.display()))?;

        let file = IndexFile {
            embedding_model: self.embedding_model.clone(),
            dim: self.dim,
            passages: self.passages.clone(),
        };
        let data = serde_json::to_string(&file)?;

        let path = index_dir.join(INDEX_FILE);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to move index into place at {}", path.display()))?;
        Ok(())
    }

    /// Return the `k` passages most similar to `query_embedding`, best first.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<PassageHit>> {
        if query_embedding.len() != self.dim {
            anyhow::bail!(
                "Query embedding has dimension {} but the index expects {}",
                query_embedding.len(),
                self.dim
            );
        }

        let mut scored: Vec<(f32, &Passage)> = self
            .passages
            .iter()
            .map(|p| (cosine_similarity(query_embedding, &p.embedding), p))
            .collect();

        // Sort descending by score
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, p)| PassageHit {
                content: p.content.clone(),
                score,
            })
            .collect())
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
