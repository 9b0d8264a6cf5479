//! Vector index management commands.

use colored::Colorize;
use serde::Serialize;

use super::{Output, runtime};
use crate::cli::IndexCommands;
use crate::config::Settings;
use crate::error::Result;
use crate::factory::create_control;
use crate::index::{EnsureOutcome, IndexDescription};

#[derive(Serialize)]
struct EnsureOutput<'a> {
    created: bool,
    index: &'a IndexDescription,
}

/// Execute an index command.
pub fn execute(command: &IndexCommands, out: Output) -> Result<()> {
    let settings = Settings::load()?;
    let control = create_control(&settings)?;
    let rt = runtime()?;

    let index_name = |name: &Option<String>| -> Result<String> {
        match name {
            Some(n) => Ok(n.clone()),
            None => settings.require_index_name().map(str::to_string),
        }
    };

    match command {
        IndexCommands::Ensure { name } => {
            let name = index_name(name)?;
            let outcome = rt.block_on(control.ensure_index(
                &name,
                &settings.pinecone_cloud,
                &settings.pinecone_region,
            ))?;
            print_ensure(&outcome, out)
        }
        IndexCommands::Describe { name } => {
            let name = index_name(name)?;
            let description = rt.block_on(control.describe_index(&name))?;
            if out.json {
                println!("{}", serde_json::to_string(&description)?);
            } else {
                print_description(&description);
            }
            Ok(())
        }
        IndexCommands::List => {
            let indexes = rt.block_on(control.list_indexes())?;
            if out.json {
                println!("{}", serde_json::to_string(&indexes)?);
            } else if indexes.is_empty() {
                println!("No indexes.");
            } else {
                for index in &indexes {
                    print_description(index);
                }
            }
            Ok(())
        }
    }
}

fn print_ensure(outcome: &EnsureOutcome, out: Output) -> Result<()> {
    let created = matches!(outcome, EnsureOutcome::Created(_));
    let description = outcome.description();

    if out.json {
        let output = EnsureOutput {
            created,
            index: description,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if created {
        println!("{} {}", "Created index".green(), description.name.bold());
    } else {
        println!("{} {}", "Index exists".dimmed(), description.name.bold());
    }
    print_description(description);
    Ok(())
}

fn print_description(index: &IndexDescription) {
    println!("{}", index.name.cyan().bold());
    if let Some(host) = &index.host {
        println!("  Host:      {host}");
    }
    if let Some(dimension) = index.dimension {
        println!("  Dimension: {dimension}");
    }
    if let Some(metric) = &index.metric {
        println!("  Metric:    {metric}");
    }
}
