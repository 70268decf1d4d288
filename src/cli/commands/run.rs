//! Run command implementation.
//!
//! Builds the run configuration, opens the target database (which also holds
//! the progress log), drives one engine pass, and reports the outcome. A
//! halted pass is printed like any other outcome and then surfaced as an
//! execution error so the process exits non-zero.

use crate::cli::RunArgs;
use crate::cli::commands::{format_time, open_target};
use crate::config::SyncConfig;
use crate::engine::{SkipReason, SyncEngine, SyncOutcome};
use crate::error::{Error, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::warn;

/// Execute the run command.
///
/// # Errors
///
/// Returns fatal engine errors, and `Execution` when a full-build pass
/// halted (after its checkpoint has been written).
pub fn execute(
    args: &RunArgs,
    db_path: Option<&PathBuf>,
    busy_timeout_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    let config = match SyncConfig::new(&args.base_path, &args.option, args.start_line) {
        Ok(config) => config,
        Err(e @ Error::InvalidConfiguration { .. }) => {
            warn!(option = %args.option, "Invalid sync option, nothing to do");
            if json {
                let output = serde_json::json!({
                    "status": "invalid_configuration",
                    "message": e.to_string(),
                });
                println!("{output}");
            } else {
                println!("{}", e.to_string().yellow());
                if let Some(hint) = e.hint() {
                    println!("  Hint: {hint}");
                }
            }
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let target = open_target(db_path, busy_timeout_ms, false)?;
    let engine = SyncEngine::new(config, &target, &target);
    let outcome = engine.run()?;

    if json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    match outcome {
        SyncOutcome::Halted { failure, .. } => Err(Error::Execution {
            target: failure.version.folder_name(),
            message: failure.message,
        }),
        _ => Ok(()),
    }
}

fn print_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Skipped {
            reason: SkipReason::NoPreviousSync,
        } => {
            println!("{}", "No previous sync found, nothing to continue.".yellow());
            println!("Start with: sqlsync run --option FROM_BUILD_B<n> [--start-line N]");
        }
        SyncOutcome::UpToDate { checkpoint } => {
            println!("{}", "Nothing was left, all updated.".green());
            println!(
                "  Last checkpoint: {} line {} ({})",
                checkpoint.build_version,
                checkpoint.line,
                format_time(&checkpoint.finished_at)
            );
        }
        SyncOutcome::Completed { checkpoint } => {
            println!("{}", "Sync finished.".green().bold());
            println!(
                "  Checkpoint: {} line {}",
                checkpoint.build_version, checkpoint.line
            );
        }
        SyncOutcome::Halted {
            checkpoint,
            failure,
        } => {
            println!(
                "{}",
                format!("Sync stopped at build {}.", failure.version.folder_name())
                    .red()
                    .bold()
            );
            println!("  Script: {}", failure.script.display());
            println!("  Cause:  {}", failure.message);
            println!(
                "  Checkpoint: {} line {} (last applied)",
                checkpoint.build_version, checkpoint.line
            );
        }
    }
}
