//! Embedding types.

use serde::Serialize;

/// Length of every query embedding; matches the index dimension.
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Which path produced an embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingSource {
    /// Parsed from the language model's response.
    Model,
    /// Deterministic hash-seeded substitute.
    Fallback,
}

impl std::fmt::Display for EmbeddingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Result from embedding generation.
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    pub embedding: Vec<f32>,
    pub source: EmbeddingSource,
}

impl EmbeddingResult {
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

/// Provider metadata.
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub dimensions: usize,
}
