//! History command implementation.

use crate::cli::commands::{format_time, open_target};
use crate::error::Result;
use crate::storage::ProgressStore;
use std::path::PathBuf;

/// List recorded checkpoints, newest first.
pub fn execute(
    db_path: Option<&PathBuf>,
    busy_timeout_ms: Option<u64>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let target = open_target(db_path, busy_timeout_ms, true)?;
    let checkpoints = target.history(limit)?;

    if json {
        println!("{}", serde_json::to_string(&checkpoints)?);
        return Ok(());
    }

    if checkpoints.is_empty() {
        println!("No sync recorded yet.");
        return Ok(());
    }

    println!("{:>6}  {:<10}  {:>8}  FINISHED", "ID", "BUILD", "LINE");
    for c in &checkpoints {
        println!(
            "{:>6}  {:<10}  {:>8}  {}",
            c.id,
            c.build_version.label(),
            c.line,
            format_time(&c.finished_at)
        );
    }

    Ok(())
}
