//! hebrag CLI entry point.

use clap::Parser;
use hebrag::cli::commands::{self, Output};
use hebrag::cli::{Cli, Commands};
use hebrag::error::Error;
use hebrag::present::Presentation;
use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose, cli.quiet);

    let out = Output {
        json: cli.json,
        quiet: cli.quiet,
        presentation: if cli.no_bidi {
            Presentation::Logical
        } else {
            Presentation::Visual
        },
    };

    match run(&cli, out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,reqwest=info,hyper=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, out: Output) -> Result<(), Error> {
    match &cli.command {
        Commands::Ask {
            question,
            top_k,
            sources,
        } => commands::ask::execute(question, *top_k, *sources, out),
        Commands::Chat { top_k } => commands::chat::execute(*top_k, out),
        Commands::Search { query, top_k } => commands::search::execute(query, *top_k, out),
        Commands::Embed { text, fallback } => commands::embed::execute(text, *fallback, out),
        Commands::Index { command } => commands::index::execute(command, out),
        Commands::Config { command } => commands::config::execute(command, out),
        Commands::Completions { shell } => commands::completions::execute(shell),
        Commands::Version => commands::version::execute(cli.json),
    }
}
