//! One-shot question answering.

use colored::Colorize;
use serde::Serialize;

use super::{Output, check_top_k, runtime};
use crate::answer::{Answer, Source};
use crate::config::Settings;
use crate::embeddings::EmbeddingSource;
use crate::error::Result;
use crate::factory::create_answer_generator;

/// "Answer from Claude:"
pub const ANSWER_HEADER: &str = "תשובה מ-Claude:";

#[derive(Serialize)]
struct AskOutput<'a> {
    question: &'a str,
    answer: &'a str,
    model: &'a str,
    embedding_source: EmbeddingSource,
    sources: &'a [Source],
}

/// Execute the ask command.
pub fn execute(question: &str, top_k: Option<usize>, show_sources: bool, out: Output) -> Result<()> {
    let settings = Settings::load()?;
    let top_k = check_top_k(top_k.unwrap_or(settings.top_k))?;

    let answer = runtime()?.block_on(async {
        let generator = create_answer_generator(&settings, top_k).await?;
        Ok::<_, crate::Error>(generator.answer(question).await)
    })?;

    let (text, sources, embedding_source) = match &answer {
        Answer::Generated {
            text,
            sources,
            embedding_source,
        } => (text, sources, embedding_source),
        Answer::Failed { .. } => return answer.clone().into_result().map(|_| ()),
    };

    if out.json {
        let output = AskOutput {
            question,
            answer: text,
            model: &settings.model,
            embedding_source: *embedding_source,
            sources,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", out.text(ANSWER_HEADER).bold());
    println!("{}", out.text(text));

    if *embedding_source == EmbeddingSource::Fallback && !out.quiet {
        eprintln!(
            "{}",
            "note: query embedding used the hash-based fallback; results may be unrelated".yellow()
        );
    }

    if show_sources {
        println!();
        println!("{}", "Sources".cyan().bold());
        for source in sources {
            println!("  {} {}", source.id.cyan(), format!("({:.4})", source.score).dimmed());
        }
    }

    Ok(())
}
