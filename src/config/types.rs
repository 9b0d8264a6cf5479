//! Configuration file types.
//!
//! Every field is optional so a partial file merges over defaults and
//! environment variables.

use serde::{Deserialize, Serialize};

/// Language model service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Vector index service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PineconeSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Data-plane host of the index. Discovered through the control plane when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Query pipeline tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Outbound calls per minute, per operation kind. 0 disables spacing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calls_per_minute: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Skip the model embedding call and always use the deterministic fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_embeddings: Option<bool>,
}

/// hebrag configuration file structure.
///
/// Stored at `~/.hebrag/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HebragConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<AnthropicSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinecone: Option<PineconeSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<PipelineSettings>,
}

impl HebragConfig {
    /// Overlay `update` on top of `self`. Fields set in `update` win.
    #[must_use]
    pub fn merged_with(self, update: &Self) -> Self {
        let anthropic = match (self.anthropic, update.anthropic.as_ref()) {
            (existing, None) => existing,
            (existing, Some(new)) => {
                let existing = existing.unwrap_or_default();
                Some(AnthropicSettings {
                    api_key: new.api_key.clone().or(existing.api_key),
                    base_url: new.base_url.clone().or(existing.base_url),
                    model: new.model.clone().or(existing.model),
                })
            }
        };

        let pinecone = match (self.pinecone, update.pinecone.as_ref()) {
            (existing, None) => existing,
            (existing, Some(new)) => {
                let existing = existing.unwrap_or_default();
                Some(PineconeSettings {
                    api_key: new.api_key.clone().or(existing.api_key),
                    index: new.index.clone().or(existing.index),
                    host: new.host.clone().or(existing.host),
                    controller_url: new.controller_url.clone().or(existing.controller_url),
                    cloud: new.cloud.clone().or(existing.cloud),
                    region: new.region.clone().or(existing.region),
                })
            }
        };

        let pipeline = match (self.pipeline, update.pipeline.as_ref()) {
            (existing, None) => existing,
            (existing, Some(new)) => {
                let existing = existing.unwrap_or_default();
                Some(PipelineSettings {
                    calls_per_minute: new.calls_per_minute.or(existing.calls_per_minute),
                    top_k: new.top_k.or(existing.top_k),
                    timeout_secs: new.timeout_secs.or(existing.timeout_secs),
                    fallback_embeddings: new.fallback_embeddings.or(existing.fallback_embeddings),
                })
            }
        };

        Self {
            anthropic,
            pinecone,
            pipeline,
        }
    }
}
