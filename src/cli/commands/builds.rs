//! Builds command implementation.
//!
//! Shows what a full sync would execute, in order, without touching the
//! database.

use crate::build::{line_count, BuildLocator};
use crate::error::Result;
use crate::model::BuildVersion;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct BuildEntry {
    build: String,
    ordinal: u64,
    lines: u64,
    path: PathBuf,
}

/// List discovered setup scripts from `from` (or the first build) onward.
///
/// # Errors
///
/// Returns an error if `from` has no number, or the tree cannot be read.
pub fn execute(base_path: &Path, from: Option<&str>, json: bool) -> Result<()> {
    let from_ordinal = from
        .map(BuildVersion::parse)
        .transpose()?
        .map_or(0, |v| v.ordinal());

    let locator = BuildLocator::new(base_path);
    let entries = locator
        .discover_from(from_ordinal)?
        .into_iter()
        .map(|script| -> Result<BuildEntry> {
            Ok(BuildEntry {
                lines: line_count(&script.path)?,
                build: script.version.label().to_string(),
                ordinal: script.ordinal,
                path: script.path,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        println!("{}", serde_json::to_string(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No setup scripts found under {}", base_path.display());
        return Ok(());
    }

    println!("{:<10}  {:>8}  PATH", "BUILD", "LINES");
    for entry in &entries {
        println!(
            "{:<10}  {:>8}  {}",
            entry.build,
            entry.lines,
            entry.path.display()
        );
    }

    Ok(())
}
