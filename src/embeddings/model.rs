//! Language-model embedding provider.
//!
//! Asks the chat model to emit the vector as text, e.g. `[0.12,-0.4,...]`,
//! and parses the reply. The result is only accepted when it has exactly
//! [`EMBEDDING_DIMENSIONS`] values.

use crate::error::{Error, Result};
use crate::llm::{LanguageModel, MessageRequest};

use super::provider::EmbeddingProvider;
use super::types::{EMBEDDING_DIMENSIONS, ProviderInfo};

const EMBEDDING_SYSTEM_PROMPT: &str = "You are an assistant that helps create embeddings. \
Please provide a 1536-dimensional embedding for the given text. \
Respond only with the embedding values separated by commas, enclosed in square brackets.";

/// Output budget for the embedding reply.
const EMBEDDING_MAX_TOKENS: u32 = 1536;

/// Embedding provider backed by a chat model.
pub struct ModelEmbeddingProvider<M: LanguageModel> {
    model: M,
    model_id: String,
}

impl<M: LanguageModel> ModelEmbeddingProvider<M> {
    pub fn new(model: M, model_id: impl Into<String>) -> Self {
        Self {
            model,
            model_id: model_id.into(),
        }
    }

    fn request_for(&self, text: &str) -> MessageRequest {
        MessageRequest::new(&self.model_id, EMBEDDING_MAX_TOKENS)
            .system(EMBEDDING_SYSTEM_PROMPT)
            .user(format!(
                "Generate a {EMBEDDING_DIMENSIONS}-dimensional embedding for this text: {text}"
            ))
    }
}

impl<M: LanguageModel> EmbeddingProvider for ModelEmbeddingProvider<M> {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: self.model.name().to_string(),
            model: self.model_id.clone(),
            dimensions: EMBEDDING_DIMENSIONS,
        }
    }

    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let request = self.request_for(text);
        let reply = self.model.create_message(&request).await?;
        parse_embedding(&reply)
    }
}

/// Parse a bracketed, comma-separated vector of exactly
/// [`EMBEDDING_DIMENSIONS`] finite floats.
pub fn parse_embedding(raw: &str) -> Result<Vec<f32>> {
    let body = raw.trim().trim_matches(|c| c == '[' || c == ']');

    let values = body
        .split(',')
        .enumerate()
        .map(|(i, token)| {
            let token = token.trim();
            match token.parse::<f32>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(Error::Embedding(format!(
                    "Invalid embedding value at position {i}: '{token}'"
                ))),
            }
        })
        .collect::<Result<Vec<f32>>>()?;

    if values.len() != EMBEDDING_DIMENSIONS {
        return Err(Error::Embedding(format!(
            "Expected {EMBEDDING_DIMENSIONS} dimensions, but got {}",
            values.len()
        )));
    }

    Ok(values)
}
