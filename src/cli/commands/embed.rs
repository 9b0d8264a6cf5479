//! Embed text and report how the vector was produced.

use colored::Colorize;
use serde::Serialize;

use super::{Output, runtime};
use crate::config::Settings;
use crate::embeddings::{EmbeddingSource, fallback_seed};
use crate::error::Result;
use crate::factory::create_embedder;

/// Number of leading components shown.
const SAMPLE_LEN: usize = 8;

#[derive(Serialize)]
struct EmbedOutput<'a> {
    text: &'a str,
    source: EmbeddingSource,
    dimensions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    sample: &'a [f32],
}

/// Execute the embed command.
pub fn execute(text: &str, fallback: bool, out: Output) -> Result<()> {
    let settings = Settings::load()?;
    let embedder = create_embedder(&settings, None, fallback)?;

    let result = runtime()?.block_on(embedder.embed(text));
    let sample = &result.embedding[..SAMPLE_LEN.min(result.embedding.len())];
    let seed = (result.source == EmbeddingSource::Fallback).then(|| fallback_seed(text));

    if out.json {
        let output = EmbedOutput {
            text,
            source: result.source,
            dimensions: result.dimensions(),
            seed,
            sample,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "Embedding".cyan().bold());
    println!("  Source:     {}", result.source);
    println!("  Dimensions: {}", result.dimensions());
    if let Some(seed) = seed {
        println!("  Seed:       {seed}");
    }
    let preview: Vec<String> = sample.iter().map(|v| format!("{v:.6}")).collect();
    println!("  Sample:     [{}, …]", preview.join(", "));

    Ok(())
}
