//! Query embeddings for nearest-neighbor retrieval.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  QueryEmbedder   │  ← never fails, rate limited
//! └────────┬─────────┘
//!          │
//!     ┌────┴──────────────┐
//!     ▼                   ▼
//! ┌─────────────────┐ ┌──────────────┐
//! │ModelEmbedding   │ │  Fallback    │
//! │Provider         │ │ MD5 → MT19937│
//! └────────┬────────┘ └──────────────┘
//!          │
//!          ▼
//!   LanguageModel
//!   (HTTP API)
//! ```
//!
//! The primary path asks the chat model to print a 1536-value vector. Any
//! failure (service error, prose instead of numbers, wrong length) is logged
//! and replaced by the fallback vector, which is deterministic per text.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hebrag::embeddings::{ModelEmbeddingProvider, QueryEmbedder};
//!
//! let embedder = QueryEmbedder::new(ModelEmbeddingProvider::new(client, "claude-3-opus-20240229"), limiter);
//! let result = embedder.embed("על פי מה נקבע שכר המינימום בישראל?").await;
//! println!("{} values from {}", result.dimensions(), result.source);
//! ```

pub mod embedder;
pub mod fallback;
pub mod model;
pub mod provider;
pub mod types;

// Re-exports for convenience
pub use embedder::QueryEmbedder;
pub use fallback::{fallback_embedding, fallback_seed};
pub use model::{ModelEmbeddingProvider, parse_embedding};
pub use provider::EmbeddingProvider;
pub use types::{EMBEDDING_DIMENSIONS, EmbeddingResult, EmbeddingSource, ProviderInfo};
