//! Status command implementation.

use crate::cli::commands::{format_time, open_target};
use crate::config::SyncConfig;
use crate::config::CONTINUE_OPTION;
use crate::engine::{StartPoint, SyncEngine};
use crate::error::Result;
use crate::model::SyncCheckpoint;
use crate::storage::ProgressStore;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Output for status command.
#[derive(Serialize)]
struct StatusOutput {
    checkpoint: Option<SyncCheckpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<StartPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_error: Option<String>,
}

/// Execute status command.
///
/// With a base path, also reports what `run --option CONTINUE` would do next.
pub fn execute(
    db_path: Option<&PathBuf>,
    busy_timeout_ms: Option<u64>,
    base_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let target = open_target(db_path, busy_timeout_ms, true)?;
    let checkpoint = target.latest_checkpoint()?;

    let (next, next_error) = match base_path {
        Some(base_path) => {
            let config = SyncConfig::new(base_path, CONTINUE_OPTION, 0)?;
            let engine = SyncEngine::new(config, &target, &target);
            match engine.resolve_start() {
                Ok(start) => (Some(start), None),
                Err(e) => (None, Some(e.to_string())),
            }
        }
        None => (None, None),
    };

    let output = StatusOutput {
        checkpoint,
        next,
        next_error,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "Sync Status".bold().underline());
    println!();

    match &output.checkpoint {
        Some(c) => {
            println!("Last checkpoint: {} line {}", c.build_version, c.line);
            println!("  Finished: {}", format_time(&c.finished_at));
        }
        None => println!("No sync recorded yet."),
    }

    if let Some(next) = &output.next {
        println!();
        match next {
            StartPoint::Resume { version, line } => {
                println!("{} resume {version} at line {line}", "Next:".blue().bold());
            }
            StartPoint::Fresh { version } => {
                println!("{} run {version} and later builds", "Next:".blue().bold());
            }
            StartPoint::NothingLeft { .. } => {
                println!("{} nothing left, all updated", "Next:".green().bold());
            }
            StartPoint::NoPreviousSync => {
                println!(
                    "{} start with --option FROM_BUILD_B<n>",
                    "Next:".yellow().bold()
                );
            }
        }
    }

    if let Some(err) = &output.next_error {
        println!();
        println!("{} {err}", "Next:".red().bold());
    }

    Ok(())
}
