//! Retrieval client: embed the query, search the index.

use tracing::debug;

use crate::embeddings::{EmbeddingProvider, EmbeddingSource, QueryEmbedder};
use crate::error::Result;
use crate::index::{Match, VectorIndex};

/// Default number of documents retrieved per question.
pub const DEFAULT_TOP_K: usize = 5;

/// Nearest-neighbor retrieval for text queries.
pub struct Retriever<P: EmbeddingProvider, I: VectorIndex> {
    embedder: QueryEmbedder<P>,
    index: I,
}

/// Matches plus how the query vector was produced.
#[derive(Debug, Clone)]
pub struct Retrieval {
    pub matches: Vec<Match>,
    pub embedding_source: EmbeddingSource,
}

impl<P: EmbeddingProvider, I: VectorIndex> Retriever<P, I> {
    pub fn new(embedder: QueryEmbedder<P>, index: I) -> Self {
        Self { embedder, index }
    }

    pub fn embedder(&self) -> &QueryEmbedder<P> {
        &self.embedder
    }

    /// Return up to `top_k` matches in the order the index ranked them.
    ///
    /// Embedding never fails; index errors propagate.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Retrieval> {
        let embedding = self.embedder.embed(query).await;
        let matches = self.index.query(&embedding.embedding, top_k, true).await?;

        debug!(
            matches = matches.len(),
            embedding_source = %embedding.source,
            "retrieved documents"
        );

        Ok(Retrieval {
            matches,
            embedding_source: embedding.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::{EMBEDDING_DIMENSIONS, ModelEmbeddingProvider};
    use crate::error::Error;
    use crate::ratelimit::RateLimiter;
    use crate::testing::{StubIndex, StubModel, text_match};
    use std::sync::Arc;

    fn fallback_embedder() -> QueryEmbedder<ModelEmbeddingProvider<&'static StubModel>> {
        QueryEmbedder::fallback_only(Arc::new(RateLimiter::per_minute("embed", 0)))
    }

    #[tokio::test]
    async fn test_retrieve_queries_index_with_metadata() {
        let index = StubIndex::returning(vec![
            text_match("c", 0.3, "שלישי"),
            text_match("a", 0.1, "ראשון"),
            text_match("b", 0.2, "שני"),
        ]);
        let retriever = Retriever::new(fallback_embedder(), &index);

        let retrieval = retriever.retrieve("שאלה", DEFAULT_TOP_K).await.unwrap();

        let ids: Vec<&str> = retrieval.matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert_eq!(retrieval.embedding_source, EmbeddingSource::Fallback);
        assert_eq!(index.queries(), vec![(EMBEDDING_DIMENSIONS, DEFAULT_TOP_K, true)]);
    }

    #[tokio::test]
    async fn test_retrieve_respects_top_k() {
        let index = StubIndex::returning(vec![
            text_match("a", 0.1, "1"),
            text_match("b", 0.2, "2"),
        ]);
        let retriever = Retriever::new(fallback_embedder(), &index);

        let retrieval = retriever.retrieve("q", 1).await.unwrap();
        assert_eq!(retrieval.matches.len(), 1);
    }

    #[tokio::test]
    async fn test_index_error_propagates() {
        let index = StubIndex::failing("503 unavailable");
        let retriever = Retriever::new(fallback_embedder(), &index);

        let result = retriever.retrieve("q", 5).await;
        assert!(matches!(result, Err(Error::Index(_))));
    }
}
