//! Command implementations.

pub mod ask;
pub mod chat;
pub mod completions;
pub mod config;
pub mod embed;
pub mod index;
pub mod search;
pub mod version;

use crate::error::{Error, Result};
use crate::present::Presentation;

/// Output options shared by all commands.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
    pub presentation: Presentation,
}

impl Output {
    /// Prepare user-facing Hebrew text for the terminal.
    #[must_use]
    pub fn text(&self, text: &str) -> String {
        self.presentation.apply(text)
    }
}

/// Create the runtime a command's async work runs on.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}

/// Reject a zero `top_k` before any service is contacted.
pub(crate) fn check_top_k(top_k: usize) -> Result<usize> {
    if top_k == 0 {
        return Err(Error::InvalidArgument("--top-k must be at least 1".to_string()));
    }
    Ok(top_k)
}

/// Shorten `text` to `max` characters for one-line display.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let head: String = flat.chars().take(max).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_zero_rejected() {
        assert!(matches!(check_top_k(0), Err(Error::InvalidArgument(_))));
        assert_eq!(check_top_k(5).unwrap(), 5);
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("שכר מינימום", 3), "שכר…");
        assert_eq!(truncate("a\nb", 10), "a b");
    }
}
