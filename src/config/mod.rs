//! Configuration management.
//!
//! Settings are resolved in layers, highest priority first:
//! 1. Process environment (a `.env` file is loaded into it by `main`)
//! 2. The config file, `~/.hebrag/config.json` (or `$HEBRAG_CONFIG`)
//! 3. Built-in defaults
//!
//! Resolution is a pure function of the parsed file and an environment
//! lookup, so tests can drive it without touching the real process state.

mod types;

pub use types::{AnthropicSettings, HebragConfig, PineconeSettings, PipelineSettings};

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
pub const DEFAULT_PINECONE_CONTROLLER_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_PINECONE_CLOUD: &str = "aws";
pub const DEFAULT_PINECONE_REGION: &str = "us-east-1";
pub const DEFAULT_CALLS_PER_MINUTE: u32 = 50;
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Get the config file path.
///
/// `HEBRAG_CONFIG` overrides the default `~/.hebrag/config.json`.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("HEBRAG_CONFIG") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    directories::BaseDirs::new()
        .map(|b| b.home_dir().join(".hebrag").join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// Load the configuration file at `path`. A missing file is an empty config.
pub fn load_config_from(path: &Path) -> Result<HebragConfig> {
    if !path.exists() {
        return Ok(HebragConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Write the configuration file at `path`, creating parent directories.
pub fn save_config_to(path: &Path, config: &HebragConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(path, content)
        .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))
}

/// Load the configuration from the default location.
pub fn load_config() -> Result<HebragConfig> {
    load_config_from(&config_path()?)
}

/// Merge `update` into the stored configuration and save it.
pub fn update_config(update: &HebragConfig) -> Result<HebragConfig> {
    let path = config_path()?;
    let merged = load_config_from(&path)?.merged_with(update);
    save_config_to(&path, &merged)?;
    Ok(merged)
}

/// Remove the stored configuration.
pub fn reset_config() -> Result<()> {
    let path = config_path()?;
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

/// Fully resolved settings used to wire the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: String,
    pub model: String,
    pub pinecone_api_key: Option<String>,
    pub pinecone_index: Option<String>,
    pub pinecone_host: Option<String>,
    pub pinecone_controller_url: String,
    pub pinecone_cloud: String,
    pub pinecone_region: String,
    pub calls_per_minute: u32,
    pub top_k: usize,
    pub timeout: Duration,
    pub fallback_embeddings: bool,
}

impl Settings {
    /// Resolve settings from the process environment and the config file.
    pub fn load() -> Result<Self> {
        let config = load_config()?;
        Self::resolve(&config, |name| std::env::var(name).ok())
    }

    /// Resolve settings from a parsed config file and an environment lookup.
    ///
    /// Empty environment values are treated as unset.
    pub fn resolve<F>(config: &HebragConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());
        let anthropic = config.anthropic.clone().unwrap_or_default();
        let pinecone = config.pinecone.clone().unwrap_or_default();
        let pipeline = config.pipeline.clone().unwrap_or_default();

        Ok(Self {
            anthropic_api_key: var("ANTHROPIC_API_KEY").or(anthropic.api_key),
            anthropic_base_url: var("ANTHROPIC_BASE_URL")
                .or(anthropic.base_url)
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            model: var("HEBRAG_MODEL")
                .or(anthropic.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            pinecone_api_key: var("PINECONE_API_KEY").or(pinecone.api_key),
            pinecone_index: var("PINECONE_INDEX").or(pinecone.index),
            pinecone_host: var("PINECONE_HOST").or(pinecone.host),
            pinecone_controller_url: var("PINECONE_CONTROLLER_URL")
                .or(pinecone.controller_url)
                .unwrap_or_else(|| DEFAULT_PINECONE_CONTROLLER_URL.to_string()),
            pinecone_cloud: var("PINECONE_CLOUD")
                .or(pinecone.cloud)
                .unwrap_or_else(|| DEFAULT_PINECONE_CLOUD.to_string()),
            pinecone_region: var("PINECONE_REGION")
                .or(pinecone.region)
                .unwrap_or_else(|| DEFAULT_PINECONE_REGION.to_string()),
            calls_per_minute: parse_var(var("HEBRAG_CALLS_PER_MINUTE"), "HEBRAG_CALLS_PER_MINUTE")?
                .or(pipeline.calls_per_minute)
                .unwrap_or(DEFAULT_CALLS_PER_MINUTE),
            top_k: parse_var(var("HEBRAG_TOP_K"), "HEBRAG_TOP_K")?
                .or(pipeline.top_k)
                .unwrap_or(DEFAULT_TOP_K),
            timeout: Duration::from_secs(
                parse_var(var("HEBRAG_TIMEOUT_SECS"), "HEBRAG_TIMEOUT_SECS")?
                    .or(pipeline.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            fallback_embeddings: parse_flag(
                var("HEBRAG_FALLBACK_EMBEDDINGS"),
                "HEBRAG_FALLBACK_EMBEDDINGS",
            )?
            .or(pipeline.fallback_embeddings)
                .unwrap_or(false),
        })
    }

    /// The language model API key, or a `MissingSetting` error.
    pub fn require_anthropic_key(&self) -> Result<&str> {
        self.anthropic_api_key
            .as_deref()
            .ok_or(Error::MissingSetting { name: "ANTHROPIC_API_KEY" })
    }

    /// The vector index API key, or a `MissingSetting` error.
    pub fn require_pinecone_key(&self) -> Result<&str> {
        self.pinecone_api_key
            .as_deref()
            .ok_or(Error::MissingSetting { name: "PINECONE_API_KEY" })
    }

    /// The vector index name, or a `MissingSetting` error.
    pub fn require_index_name(&self) -> Result<&str> {
        self.pinecone_index
            .as_deref()
            .ok_or(Error::MissingSetting { name: "PINECONE_INDEX" })
    }
}

fn parse_var<T: FromStr>(value: Option<String>, name: &str) -> Result<Option<T>> {
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| Error::Config(format!("{name} must be a number, got '{v}'")))
        })
        .transpose()
}

fn parse_flag(value: Option<String>, name: &str) -> Result<Option<bool>> {
    value
        .map(|v| match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(Error::Config(format!(
                "{name} must be true or false, got '{v}'"
            ))),
        })
        .transpose()
}

/// Mask a secret for display, keeping a short prefix.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(6).collect();
    if secret.chars().count() <= 6 {
        "****".to_string()
    } else {
        format!("{prefix}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_config_or_env() {
        let settings = Settings::resolve(&HebragConfig::default(), env_from(&[])).unwrap();
        assert_eq!(settings.anthropic_base_url, DEFAULT_ANTHROPIC_BASE_URL);
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.top_k, 5);
        assert_eq!(settings.calls_per_minute, DEFAULT_CALLS_PER_MINUTE);
        assert_eq!(settings.timeout, Duration::from_secs(120));
        assert!(!settings.fallback_embeddings);
        assert!(settings.pinecone_index.is_none());
    }

    #[test]
    fn test_env_overrides_config_file() {
        let config = HebragConfig {
            pinecone: Some(PineconeSettings {
                index: Some("from-file".into()),
                region: Some("eu-west-1".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let env = env_from(&[("PINECONE_INDEX", "from-env"), ("HEBRAG_TOP_K", "3")]);

        let settings = Settings::resolve(&config, env).unwrap();
        assert_eq!(settings.pinecone_index.as_deref(), Some("from-env"));
        assert_eq!(settings.pinecone_region, "eu-west-1");
        assert_eq!(settings.top_k, 3);
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let config = HebragConfig {
            anthropic: Some(AnthropicSettings {
                model: Some("claude-from-file".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let settings = Settings::resolve(&config, env_from(&[("HEBRAG_MODEL", "  ")])).unwrap();
        assert_eq!(settings.model, "claude-from-file");
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let result = Settings::resolve(
            &HebragConfig::default(),
            env_from(&[("HEBRAG_CALLS_PER_MINUTE", "fast")]),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_require_reports_missing_variable() {
        let settings = Settings::resolve(&HebragConfig::default(), env_from(&[])).unwrap();
        assert!(matches!(
            settings.require_index_name(),
            Err(Error::MissingSetting { name: "PINECONE_INDEX" })
        ));
        assert!(matches!(
            settings.require_anthropic_key(),
            Err(Error::MissingSetting { name: "ANTHROPIC_API_KEY" })
        ));
    }

    #[test]
    fn test_fallback_flag_parsing() {
        let on = Settings::resolve(
            &HebragConfig::default(),
            env_from(&[("HEBRAG_FALLBACK_EMBEDDINGS", "1")]),
        )
        .unwrap();
        let off = Settings::resolve(
            &HebragConfig::default(),
            env_from(&[("HEBRAG_FALLBACK_EMBEDDINGS", "false")]),
        )
        .unwrap();
        assert!(on.fallback_embeddings);
        assert!(!off.fallback_embeddings);
    }

    #[test]
    fn test_fallback_flag_is_case_insensitive() {
        for (value, expected) in [
            ("False", false),
            ("no", false),
            ("OFF", false),
            ("TRUE", true),
            (" yes ", true),
            ("On", true),
        ] {
            let settings = Settings::resolve(
                &HebragConfig::default(),
                env_from(&[("HEBRAG_FALLBACK_EMBEDDINGS", value)]),
            )
            .unwrap();
            assert_eq!(settings.fallback_embeddings, expected, "value {value:?}");
        }
    }

    #[test]
    fn test_unknown_fallback_flag_is_config_error() {
        let err = Settings::resolve(
            &HebragConfig::default(),
            env_from(&[("HEBRAG_FALLBACK_EMBEDDINGS", "maybe")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("HEBRAG_FALLBACK_EMBEDDINGS"));
    }

    #[test]
    fn test_config_file_roundtrip_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert_eq!(load_config_from(&path).unwrap(), HebragConfig::default());

        let config = HebragConfig {
            pipeline: Some(PipelineSettings {
                calls_per_minute: Some(30),
                ..Default::default()
            }),
            ..Default::default()
        };
        save_config_to(&path, &config).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-ant-api03-abcdef"), "sk-ant****");
        assert_eq!(mask_secret("short"), "****");
    }
}
