//! Embedding provider trait.
//!
//! Defines the interface for the primary (fallible) embedding path.
//! Uses async methods for HTTP-based providers.

use crate::error::Result;
use super::types::ProviderInfo;

/// Trait for embedding providers.
pub trait EmbeddingProvider: Send + Sync {
    /// Get provider metadata.
    fn info(&self) -> ProviderInfo;

    /// Generate embedding for a single text.
    ///
    /// Implementations return an error for any response that is not a
    /// well-formed vector of the expected dimension.
    fn generate_embedding(&self, text: &str) -> impl std::future::Future<Output = Result<Vec<f32>>> + Send;
}
