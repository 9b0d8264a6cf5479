//! Version command implementation.

use crate::config::DEFAULT_MODEL;
use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    default_model: &'a str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };

    if json {
        let output = VersionOutput {
            version,
            build,
            default_model: DEFAULT_MODEL,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("hebrag version {version} ({build})");
    Ok(())
}
