//! Retrieval-only search: show which documents a query pulls in.

use colored::Colorize;
use serde::Serialize;

use super::{Output, check_top_k, runtime, truncate};
use crate::config::Settings;
use crate::embeddings::EmbeddingSource;
use crate::error::Result;
use crate::factory::create_retriever;
use crate::index::Match;

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    top_k: usize,
    embedding_source: EmbeddingSource,
    matches: &'a [Match],
}

/// Execute the search command.
pub fn execute(query: &str, top_k: Option<usize>, out: Output) -> Result<()> {
    let settings = Settings::load()?;
    let top_k = check_top_k(top_k.unwrap_or(settings.top_k))?;

    let retrieval = runtime()?.block_on(async {
        let retriever = create_retriever(&settings).await?;
        retriever.retrieve(query, top_k).await
    })?;

    if out.json {
        let output = SearchOutput {
            query,
            top_k,
            embedding_source: retrieval.embedding_source,
            matches: &retrieval.matches,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if retrieval.matches.is_empty() {
        println!("No matching documents.");
        return Ok(());
    }

    println!(
        "{} {}",
        format!("{} matches", retrieval.matches.len()).cyan().bold(),
        format!("(embedding: {})", retrieval.embedding_source).dimmed()
    );
    for (rank, m) in retrieval.matches.iter().enumerate() {
        let text = m.text().map_or_else(
            |_| "(no text)".dimmed().to_string(),
            |t| out.text(&truncate(t, 120)),
        );
        println!(
            "{:>3}. {} {}",
            rank + 1,
            m.id.cyan(),
            format!("[{:.4}]", m.score).yellow()
        );
        println!("     {text}");
    }

    Ok(())
}
