//! Query embedding with graceful degradation.
//!
//! [`QueryEmbedder`] wraps a fallible [`EmbeddingProvider`] and never fails:
//! any primary-path error is logged and replaced by the deterministic
//! fallback vector.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::ratelimit::RateLimiter;

use super::fallback::fallback_embedding;
use super::provider::EmbeddingProvider;
use super::types::{EmbeddingResult, EmbeddingSource};

/// Embeds queries, falling back to a hash-seeded vector on any failure.
pub struct QueryEmbedder<P: EmbeddingProvider> {
    provider: Option<P>,
    limiter: Arc<RateLimiter>,
}

impl<P: EmbeddingProvider> QueryEmbedder<P> {
    /// Use `provider` as the primary path, rate limited by `limiter`.
    pub fn new(provider: P, limiter: Arc<RateLimiter>) -> Self {
        Self {
            provider: Some(provider),
            limiter,
        }
    }

    /// Skip the primary path and always return fallback vectors.
    pub fn fallback_only(limiter: Arc<RateLimiter>) -> Self {
        Self {
            provider: None,
            limiter,
        }
    }

    /// Primary provider, if configured.
    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Embed `text`. Always returns a vector of the index dimension.
    pub async fn embed(&self, text: &str) -> EmbeddingResult {
        let Some(provider) = &self.provider else {
            debug!("primary embedding disabled, using fallback");
            return fallback_result(text);
        };

        match self.limiter.run(|| provider.generate_embedding(text)).await {
            Ok(embedding) => {
                debug!(dimensions = embedding.len(), "model embedding");
                EmbeddingResult {
                    embedding,
                    source: EmbeddingSource::Model,
                }
            }
            Err(e) => {
                warn!(error = %e, "embedding query failed, falling back to hash-based embedding");
                fallback_result(text)
            }
        }
    }
}

fn fallback_result(text: &str) -> EmbeddingResult {
    EmbeddingResult {
        embedding: fallback_embedding(text),
        source: EmbeddingSource::Fallback,
    }
}
