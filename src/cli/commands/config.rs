//! Config command implementation.
//!
//! `show` prints the effective settings (environment over file over
//! defaults); `set` merges into the file; `reset` deletes it.

use colored::Colorize;
use serde::Serialize;

use super::Output;
use crate::cli::ConfigCommands;
use crate::config::{
    AnthropicSettings, HebragConfig, PineconeSettings, PipelineSettings, Settings, config_path,
    mask_secret, reset_config, update_config,
};
use crate::error::{Error, Result};

#[derive(Serialize)]
struct ShowOutput<'a> {
    config_path: String,
    anthropic_api_key: Option<String>,
    anthropic_base_url: &'a str,
    model: &'a str,
    pinecone_api_key: Option<String>,
    pinecone_index: Option<&'a str>,
    pinecone_host: Option<&'a str>,
    pinecone_controller_url: &'a str,
    pinecone_cloud: &'a str,
    pinecone_region: &'a str,
    calls_per_minute: u32,
    top_k: usize,
    timeout_secs: u64,
    fallback_embeddings: bool,
}

impl<'a> ShowOutput<'a> {
    fn new(settings: &'a Settings, config_path: String) -> Self {
        Self {
            config_path,
            anthropic_api_key: settings.anthropic_api_key.as_deref().map(mask_secret),
            anthropic_base_url: &settings.anthropic_base_url,
            model: &settings.model,
            pinecone_api_key: settings.pinecone_api_key.as_deref().map(mask_secret),
            pinecone_index: settings.pinecone_index.as_deref(),
            pinecone_host: settings.pinecone_host.as_deref(),
            pinecone_controller_url: &settings.pinecone_controller_url,
            pinecone_cloud: &settings.pinecone_cloud,
            pinecone_region: &settings.pinecone_region,
            calls_per_minute: settings.calls_per_minute,
            top_k: settings.top_k,
            timeout_secs: settings.timeout.as_secs(),
            fallback_embeddings: settings.fallback_embeddings,
        }
    }
}

/// Execute a config command.
pub fn execute(command: &ConfigCommands, out: Output) -> Result<()> {
    match command {
        ConfigCommands::Show => show(out),
        ConfigCommands::Set { .. } => {
            let update = update_from(command)?;
            if update == HebragConfig::default() {
                return Err(Error::InvalidArgument(
                    "Nothing to set; pass at least one option (see --help)".to_string(),
                ));
            }
            update_config(&update)?;
            if !out.json && !out.quiet {
                println!("{}", "Configuration updated".green());
            }
            show(out)
        }
        ConfigCommands::Reset => {
            reset_config()?;
            let path = config_path()?.display().to_string();
            if out.json {
                println!("{}", serde_json::json!({ "reset": true, "config_path": path }));
            } else {
                println!("Removed {path}");
            }
            Ok(())
        }
    }
}

fn show(out: Output) -> Result<()> {
    let settings = Settings::load()?;
    let output = ShowOutput::new(&settings, config_path()?.display().to_string());

    if out.json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let unset = || "(unset)".dimmed().to_string();
    println!("{}", "Settings".cyan().bold());
    println!("  Config file:      {}", output.config_path);
    println!(
        "  Anthropic key:    {}",
        output.anthropic_api_key.unwrap_or_else(unset)
    );
    println!("  Anthropic URL:    {}", output.anthropic_base_url);
    println!("  Model:            {}", output.model);
    println!(
        "  Pinecone key:     {}",
        output.pinecone_api_key.unwrap_or_else(unset)
    );
    println!(
        "  Index:            {}",
        output.pinecone_index.map_or_else(unset, str::to_string)
    );
    println!(
        "  Index host:       {}",
        output.pinecone_host.map_or_else(unset, str::to_string)
    );
    println!("  Controller URL:   {}", output.pinecone_controller_url);
    println!(
        "  Cloud / region:   {} / {}",
        output.pinecone_cloud, output.pinecone_region
    );
    println!("  Calls per minute: {}", output.calls_per_minute);
    println!("  Top k:            {}", output.top_k);
    println!("  Timeout:          {}s", output.timeout_secs);
    println!("  Fallback only:    {}", output.fallback_embeddings);
    Ok(())
}

/// Build a partial config from `config set` options.
fn update_from(command: &ConfigCommands) -> Result<HebragConfig> {
    let ConfigCommands::Set {
        anthropic_key,
        base_url,
        model,
        pinecone_key,
        index,
        host,
        cloud,
        region,
        calls_per_minute,
        top_k,
        timeout_secs,
        fallback_embeddings,
    } = command
    else {
        return Err(Error::InvalidArgument("expected `config set`".to_string()));
    };

    if *top_k == Some(0) {
        return Err(Error::InvalidArgument("--top-k must be at least 1".to_string()));
    }

    let anthropic = AnthropicSettings {
        api_key: anthropic_key.clone(),
        base_url: base_url.clone(),
        model: model.clone(),
    };
    let pinecone = PineconeSettings {
        api_key: pinecone_key.clone(),
        index: index.clone(),
        host: host.clone(),
        controller_url: None,
        cloud: cloud.clone(),
        region: region.clone(),
    };
    let pipeline = PipelineSettings {
        calls_per_minute: *calls_per_minute,
        top_k: *top_k,
        timeout_secs: *timeout_secs,
        fallback_embeddings: *fallback_embeddings,
    };

    Ok(HebragConfig {
        anthropic: (anthropic != AnthropicSettings::default()).then_some(anthropic),
        pinecone: (pinecone != PineconeSettings::default()).then_some(pinecone),
        pipeline: (pipeline != PipelineSettings::default()).then_some(pipeline),
    })
}
