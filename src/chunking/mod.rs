//! Document loading and passage splitting for the offline index build.

pub mod splitter;

use std::path::Path;

use anyhow::{Context, Result};

pub use splitter::TextSplitter;

/// Supported source document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Map a file extension to a document kind.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "md" | "text" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

/// Load the full text of a source document.
pub fn load_document(path: &Path) -> Result<String> {
    let kind = DocumentKind::from_path(path)
        .with_context(|| format!("Unsupported document type: {}", path.display()))?;

    match kind {
        DocumentKind::Pdf => load_pdf(path),
        DocumentKind::PlainText => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn load_pdf(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| anyhow::anyhow!("PDF extraction failed for {}: {e}", path.display()))?;

    if text.trim().is_empty() {
        anyhow::bail!(
            "{} contains no extractable text (image-based or encrypted?)",
            path.display()
        );
    }
    Ok(text)
}
