//! CLI definitions using clap.

use clap::{Parser, Subcommand};

pub mod commands;

/// Hebrew retrieval-augmented question answering over a document index
#[derive(Parser, Debug)]
#[command(name = "hebrag", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print Hebrew in logical order (for terminals with native bidi support)
    #[arg(long, global = true)]
    pub no_bidi: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer one question from the indexed documents
    Ask {
        /// Question, in Hebrew
        question: String,

        /// Number of documents to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Also list the documents the answer was based on
        #[arg(long)]
        sources: bool,
    },

    /// Interactive chat session
    Chat {
        /// Number of documents to retrieve per question
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show the documents retrieved for a query
    Search {
        /// Query text
        query: String,

        /// Number of documents to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Embed text and show the resulting vector
    Embed {
        /// Text to embed
        text: String,

        /// Skip the model and use the hash-seeded embedding
        #[arg(long)]
        fallback: bool,
    },

    /// Vector index management
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print version information
    Version,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Index Commands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum IndexCommands {
    /// Create the configured index if it does not exist
    Ensure {
        /// Index name (defaults to PINECONE_INDEX)
        #[arg(long)]
        name: Option<String>,
    },

    /// Describe the configured index
    Describe {
        /// Index name (defaults to PINECONE_INDEX)
        #[arg(long)]
        name: Option<String>,
    },

    /// List indexes in the project
    List,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show effective settings (secrets masked)
    Show,

    /// Persist settings to the config file
    Set {
        /// Anthropic API key
        #[arg(long)]
        anthropic_key: Option<String>,

        /// Anthropic API base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Model used for embeddings and answers
        #[arg(long)]
        model: Option<String>,

        /// Pinecone API key
        #[arg(long)]
        pinecone_key: Option<String>,

        /// Pinecone index name
        #[arg(long)]
        index: Option<String>,

        /// Pinecone index host
        #[arg(long)]
        host: Option<String>,

        /// Serverless cloud for index creation
        #[arg(long)]
        cloud: Option<String>,

        /// Serverless region for index creation
        #[arg(long)]
        region: Option<String>,

        /// Maximum model calls per minute per operation kind (0 disables)
        #[arg(long)]
        calls_per_minute: Option<u32>,

        /// Default number of retrieved documents
        #[arg(long)]
        top_k: Option<usize>,

        /// HTTP timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Always use hash-seeded embeddings
        #[arg(long)]
        fallback_embeddings: Option<bool>,
    },

    /// Delete the config file
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_flags() {
        let cli = Cli::parse_from(["hebrag", "--no-bidi", "ask", "מה השעה?", "-k", "3", "--sources"]);
        assert!(cli.no_bidi);
        match cli.command {
            Commands::Ask {
                question,
                top_k,
                sources,
            } => {
                assert_eq!(question, "מה השעה?");
                assert_eq!(top_k, Some(3));
                assert!(sources);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["hebrag", "embed", "שלום", "--fallback", "--json", "-vv"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Embed { fallback: true, .. }));
    }
}
