//! Provision the progress log.
//!
//! Creates the target database if needed and the `build_sync_log` table if
//! missing. Safe to run repeatedly.

use crate::cli::commands::open_target;
use crate::config::resolve_db_path;
use crate::error::Result;
use crate::storage::schema::SYNC_LOG_TABLE;
use crate::storage::ProgressStore;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    table: &'static str,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the table created.
pub fn execute(db_path: Option<&PathBuf>, busy_timeout_ms: Option<u64>, json: bool) -> Result<()> {
    let database = resolve_db_path(db_path.map(PathBuf::as_path))?;
    let target = open_target(db_path, busy_timeout_ms, false)?;
    target.ensure_schema()?;

    if json {
        let output = InitOutput {
            database,
            table: SYNC_LOG_TABLE,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Progress log ready");
        println!("  Database: {}", database.display());
        println!("  Table:    {SYNC_LOG_TABLE}");
    }

    Ok(())
}
