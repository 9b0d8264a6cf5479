//! Vector index access.
//!
//! The index is an external service. The query path only needs
//! nearest-neighbor search ([`VectorIndex`]); creating the index is a
//! one-time bootstrap step handled by [`PineconeControl`].

pub mod pinecone;

pub use pinecone::{EnsureOutcome, IndexDescription, PineconeControl, PineconeIndex};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Distance metric the index is created with.
pub const INDEX_METRIC: &str = "euclidean";

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    /// Distance or similarity as reported by the index.
    #[serde(default)]
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Match {
    /// The document excerpt stored under the `text` metadata key.
    pub fn text(&self) -> Result<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("text"))
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Error::Retrieval(format!("match '{}' has no text metadata", self.id)))
    }
}

/// Nearest-neighbor search over stored vectors.
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` matches for `vector`, in the index's ranking order.
    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> impl std::future::Future<Output = Result<Vec<Match>>> + Send;
}

impl<I: VectorIndex> VectorIndex for &I {
    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> impl std::future::Future<Output = Result<Vec<Match>>> + Send {
        (**self).query(vector, top_k, include_metadata)
    }
}
