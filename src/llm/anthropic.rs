//! Anthropic Messages API client.
//!
//! Requires an API key (`ANTHROPIC_API_KEY`).

use crate::config::mask_secret;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::LanguageModel;
use super::types::MessageRequest;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
pub struct AnthropicClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AnthropicClient {
    /// Create a client for `base_url` (e.g. `https://api.anthropic.com`).
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::LanguageModel(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/messages", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }

    /// Messages endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &mask_secret(&self.api_key))
            .finish_non_exhaustive()
    }
}

/// Messages API response. Only the content blocks are read.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// Messages API error body.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

impl LanguageModel for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn create_message(&self, request: &MessageRequest) -> Result<String> {
        debug!(model = %request.model, max_tokens = request.max_tokens, "create message");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::LanguageModel(format!("Anthropic request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| format!("{}: {}", e.error.kind, e.error.message))
                .unwrap_or(body);
            return Err(Error::LanguageModel(format!(
                "Anthropic API error ({status}): {detail}"
            )));
        }

        let data: MessageResponse = response
            .json()
            .await
            .map_err(|e| Error::LanguageModel(format!("Failed to parse Anthropic response: {e}")))?;

        let first = data
            .content
            .into_iter()
            .next()
            .ok_or_else(|| Error::LanguageModel("Anthropic returned no content blocks".into()))?;

        first.text.ok_or_else(|| {
            Error::LanguageModel(format!("First content block is '{}', not text", first.kind))
        })
    }
}
