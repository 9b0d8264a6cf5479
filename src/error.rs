//! Error types for hebrag.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=config, 3=model, 4=validation, etc.)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

/// Result type alias for hebrag operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Config (exit 2)
    ConfigError,

    // Language model (exit 3)
    LanguageModelError,

    // Validation (exit 4)
    InvalidArgument,

    // Vector index (exit 5)
    IndexError,
    RetrievalError,

    // Embedding (exit 6)
    EmbeddingError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::LanguageModelError => "LANGUAGE_MODEL_ERROR",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::IndexError => "INDEX_ERROR",
            Self::RetrievalError => "RETRIEVAL_ERROR",
            Self::EmbeddingError => "EMBEDDING_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::ConfigError => 2,
            Self::LanguageModelError => 3,
            Self::InvalidArgument => 4,
            Self::IndexError | Self::RetrievalError => 5,
            Self::EmbeddingError => 6,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying the same command may succeed.
    ///
    /// True for remote-service failures, which are usually transient
    /// (overload, rate limiting). False for configuration and input errors.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LanguageModelError | Self::IndexError | Self::EmbeddingError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in hebrag operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing setting: {name}")]
    MissingSetting {
        /// Environment variable that supplies the setting.
        name: &'static str,
    },

    #[error("Language model error: {0}")]
    LanguageModel(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("Retrieval unavailable: {0}")]
    Retrieval(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config(_) | Self::MissingSetting { .. } => ErrorCode::ConfigError,
            Self::LanguageModel(_) => ErrorCode::LanguageModelError,
            Self::Embedding(_) => ErrorCode::EmbeddingError,
            Self::Index(_) => ErrorCode::IndexError,
            Self::Retrieval(_) => ErrorCode::RetrievalError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingSetting { name } => Some(format!(
                "Export {name} (a .env file in the working directory also works), \
                 or store it with `hebrag config set`."
            )),

            Self::LanguageModel(msg) => {
                if msg.contains("401") || msg.contains("authentication") {
                    Some("Check ANTHROPIC_API_KEY.".to_string())
                } else if msg.contains("429") || msg.contains("rate_limit") {
                    Some(
                        "The model API is rate limiting. Lower HEBRAG_CALLS_PER_MINUTE \
                         or retry later."
                            .to_string(),
                    )
                } else {
                    None
                }
            }

            Self::Index(msg) => {
                if msg.contains("404") {
                    Some(
                        "Index not found. Run `hebrag index ensure` to create it, \
                         or check PINECONE_INDEX."
                            .to_string(),
                    )
                } else if msg.contains("401") || msg.contains("403") {
                    Some("Check PINECONE_API_KEY.".to_string())
                } else {
                    None
                }
            }

            Self::Retrieval(_) => Some(
                "Every stored vector needs a string `text` metadata field.".to_string(),
            ),

            Self::Config(_) => Some("Inspect the resolved settings with `hebrag config show`.".to_string()),

            Self::Embedding(_)
            | Self::InvalidArgument(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
