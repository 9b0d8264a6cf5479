//! Pipeline wiring from resolved [`Settings`].
//!
//! Each operation kind gets its own [`RateLimiter`] so a burst of answers
//! does not starve query embedding, and vice versa.

use std::sync::Arc;
use tracing::{debug, info};

use crate::answer::AnswerGenerator;
use crate::config::Settings;
use crate::embeddings::{ModelEmbeddingProvider, QueryEmbedder};
use crate::error::Result;
use crate::index::{PineconeControl, PineconeIndex};
use crate::llm::AnthropicClient;
use crate::ratelimit::RateLimiter;
use crate::retrieval::Retriever;

/// Shared model client.
pub type SharedModel = Arc<AnthropicClient>;

/// Embedding provider backed by the shared model client.
pub type ModelProvider = ModelEmbeddingProvider<SharedModel>;

/// The retriever the CLI runs.
pub type DefaultRetriever = Retriever<ModelProvider, PineconeIndex>;

/// The answer generator the CLI runs.
pub type DefaultGenerator = AnswerGenerator<SharedModel, ModelProvider, PineconeIndex>;

/// Create the Anthropic client.
pub fn create_language_model(settings: &Settings) -> Result<SharedModel> {
    let client = AnthropicClient::new(
        &settings.anthropic_base_url,
        settings.require_anthropic_key()?,
        settings.timeout,
    )?;
    debug!(endpoint = client.endpoint(), model = %settings.model, "language model ready");
    Ok(Arc::new(client))
}

/// Create the control-plane client used for index bootstrap.
pub fn create_control(settings: &Settings) -> Result<PineconeControl> {
    PineconeControl::new(
        &settings.pinecone_controller_url,
        settings.require_pinecone_key()?,
        settings.timeout,
    )
}

/// Connect to the configured index.
///
/// Uses the configured host when set, otherwise asks the control plane.
pub async fn connect_index(settings: &Settings) -> Result<PineconeIndex> {
    let api_key = settings.require_pinecone_key()?;

    let host = match &settings.pinecone_host {
        Some(host) => host.clone(),
        None => {
            let name = settings.require_index_name()?;
            let host = create_control(settings)?.resolve_host(name).await?;
            info!(index = name, host = %host, "resolved index host");
            host
        }
    };

    PineconeIndex::new(&host, api_key, settings.timeout)
}

/// Create a query embedder.
///
/// `force_fallback` (or the `fallback_embeddings` setting) skips the model
/// path entirely, which also means no Anthropic key is needed.
pub fn create_embedder(
    settings: &Settings,
    model: Option<SharedModel>,
    force_fallback: bool,
) -> Result<QueryEmbedder<ModelProvider>> {
    let limiter = Arc::new(RateLimiter::per_minute("embed", settings.calls_per_minute));

    if force_fallback || settings.fallback_embeddings {
        debug!("model embeddings disabled");
        return Ok(QueryEmbedder::fallback_only(limiter));
    }

    let model = match model {
        Some(m) => m,
        None => create_language_model(settings)?,
    };
    let provider = ModelEmbeddingProvider::new(model, settings.model.clone());
    Ok(QueryEmbedder::new(provider, limiter))
}

/// Create a retriever against the configured index.
pub async fn create_retriever(settings: &Settings) -> Result<DefaultRetriever> {
    let embedder = create_embedder(settings, None, false)?;
    let index = connect_index(settings).await?;
    Ok(Retriever::new(embedder, index))
}

/// Create the full answering pipeline.
pub async fn create_answer_generator(settings: &Settings, top_k: usize) -> Result<DefaultGenerator> {
    let model = create_language_model(settings)?;
    let embedder = create_embedder(settings, Some(Arc::clone(&model)), false)?;
    let index = connect_index(settings).await?;

    Ok(AnswerGenerator::new(
        Retriever::new(embedder, index),
        model,
        settings.model.clone(),
        Arc::new(RateLimiter::per_minute("answer", settings.calls_per_minute)),
        top_k,
    ))
}
