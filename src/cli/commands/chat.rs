//! Interactive chat REPL.
//!
//! Plain lines are questions; lines starting with `/` are session commands.

use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing::info;

use super::{Output, check_top_k, runtime, truncate};
use crate::answer::Answerer;
use crate::chat::{ChatSession, EXAMPLE_PROMPTS, Turn};
use crate::config::Settings;
use crate::present::Presentation;
use crate::error::Result;
use crate::factory::create_answer_generator;

/// "Hebrew RAG chat with Claude"
const TITLE: &str = "צ'אט RAG בעברית עם Claude";

const HELP: &str = "/examples  /example N  /history  /clear  /quit";

/// One parsed line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Question(&'a str),
    Examples,
    Example(usize),
    History,
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Question(line);
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("examples"), None) => Input::Examples,
        (Some("example"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if (1..=EXAMPLE_PROMPTS.len()).contains(&n) => Input::Example(n),
            _ => Input::Unknown(line),
        },
        (Some("history"), None) => Input::History,
        (Some("clear"), None) => Input::Clear,
        (Some("help"), None) => Input::Help,
        (Some("quit" | "exit"), None) => Input::Quit,
        _ => Input::Unknown(line),
    }
}

/// Execute the chat command.
pub fn execute(top_k: Option<usize>, out: Output) -> Result<()> {
    let settings = Settings::load()?;
    let top_k = check_top_k(top_k.unwrap_or(settings.top_k))?;

    let rt = runtime()?;
    let generator = rt.block_on(create_answer_generator(&settings, top_k))?;
    let mut session = ChatSession::new(generator, out.presentation);
    info!(session = session.id(), model = %settings.model, top_k, "chat started");

    if !out.json {
        println!("{}", out.text(TITLE).cyan().bold());
        println!("{}", HELP.dimmed());
        println!();
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if !out.json {
            print!("{} ", ">".green().bold());
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => println!("{}", HELP.dimmed()),
            Input::Examples => print_examples(out),
            Input::Example(n) => {
                let question = EXAMPLE_PROMPTS[n - 1];
                if !out.json {
                    println!("{} {}", ">".dimmed(), out.text(question));
                }
                ask(&rt, &mut session, question, out)?;
            }
            Input::Question(question) => ask(&rt, &mut session, question, out)?,
            Input::History => print_history(session.history(), out)?,
            Input::Clear => {
                session.clear();
                if !out.json {
                    println!("{}", "History cleared".dimmed());
                }
            }
            Input::Unknown(command) => {
                if !out.quiet {
                    eprintln!("{} {command}  ({HELP})", "Unknown command:".yellow());
                }
            }
        }
    }

    info!(session = session.id(), turns = session.history().len(), "chat ended");
    Ok(())
}

fn ask<A: Answerer>(
    rt: &tokio::runtime::Runtime,
    session: &mut ChatSession<A>,
    question: &str,
    out: Output,
) -> Result<()> {
    let turn = rt.block_on(session.submit(question));

    if out.json {
        println!("{}", serde_json::to_string(turn)?);
    } else {
        let reply = turn.bot.as_deref().unwrap_or_default();
        if turn.answered {
            println!("{reply}");
        } else {
            println!("{}", reply.red());
        }
        println!();
    }
    Ok(())
}

fn print_examples(out: Output) {
    if out.json {
        let payload = serde_json::json!({ "examples": EXAMPLE_PROMPTS });
        println!("{payload}");
        return;
    }
    for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).cyan(), out.text(prompt));
    }
}

fn print_history(history: &[Turn], out: Output) -> Result<()> {
    if out.json {
        println!("{}", serde_json::to_string(history)?);
        return Ok(());
    }
    if history.is_empty() {
        println!("{}", "No messages yet".dimmed());
        return Ok(());
    }
    for turn in history {
        println!(
            "{} {}",
            turn.asked_at.format("%H:%M:%S").to_string().dimmed(),
            preview(&turn.question, PREVIEW_LEN, out.presentation).bold()
        );
        println!(
            "         {}",
            preview(turn.answer.as_deref().unwrap_or("…"), PREVIEW_LEN, out.presentation)
        );
    }
    Ok(())
}

/// Maximum characters of each history line.
const PREVIEW_LEN: usize = 80;

/// Shorten logical-order `text` to its opening words, then prepare it for display.
fn preview(text: &str, max: usize, presentation: Presentation) -> String {
    presentation.apply(&truncate(text, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::present;

    #[test]
    fn test_plain_line_is_question() {
        assert_eq!(parse_input("  מה השכר?  "), Input::Question("מה השכר?"));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_input("/examples"), Input::Examples);
        assert_eq!(parse_input("/example 2"), Input::Example(2));
        assert_eq!(parse_input("/history"), Input::History);
        assert_eq!(parse_input("/clear"), Input::Clear);
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("/exit"), Input::Quit);
        assert_eq!(parse_input(""), Input::Empty);
    }

    #[test]
    fn test_example_out_of_range() {
        assert_eq!(parse_input("/example 0"), Input::Unknown("/example 0"));
        assert_eq!(parse_input("/example 4"), Input::Unknown("/example 4"));
        assert_eq!(parse_input("/example x"), Input::Unknown("/example x"));
    }

    #[test]
    fn test_preview_keeps_opening_words() {
        let answer = "שכר המינימום בישראל נקבע בחוק ומתעדכן מעת לעת";

        assert_eq!(
            preview(answer, 19, Presentation::Logical),
            "שכר המינימום בישראל…"
        );

        let shown = preview(answer, 19, Presentation::Visual);
        assert_eq!(shown, present("שכר המינימום בישראל…"));
        assert!(shown.contains("לארשיב"));
        assert!(!shown.contains("תעל"));
    }

    #[test]
    fn test_preview_of_short_text_is_whole() {
        assert_eq!(preview("שלום", 80, Presentation::Visual), "םולש");
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse_input("/bogus"), Input::Unknown("/bogus"));
    }
}
