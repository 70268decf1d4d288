//! Run configuration.
//!
//! Everything the engine needs is gathered once at startup into a
//! [`SyncConfig`] value and handed to the engine; nothing below this module
//! reads the environment.
//!
//! Sources, in priority order (resolved by clap):
//! 1. Command-line flags
//! 2. `SQLSYNC_*` environment variables
//! 3. Defaults (`start_line = 0`)

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::build::extract_build_label;
use crate::error::{Error, Result};
use crate::model::BuildVersion;

/// Option value that resumes from the last checkpoint.
pub const CONTINUE_OPTION: &str = "CONTINUE";

/// Prefix of the option value that starts from an explicit build.
pub const FROM_BUILD_PREFIX: &str = "FROM_BUILD_B";

/// How a run decides where to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOption {
    /// Resume from the most recent checkpoint.
    Continue,
    /// Start at an explicit build (and the configured start line).
    FromBuild(BuildVersion),
}

impl SyncOption {
    /// Parse `CONTINUE` or `FROM_BUILD_B<n>`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for blank or unrecognized values and
    /// `MalformedVersion` for `FROM_BUILD_B` without a number.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();

        if raw == CONTINUE_OPTION {
            return Ok(Self::Continue);
        }

        if raw.starts_with(FROM_BUILD_PREFIX) {
            let label = extract_build_label(&raw[FROM_BUILD_PREFIX.len() - 1..])?;
            return Ok(Self::FromBuild(BuildVersion::parse(&label)?));
        }

        Err(Error::InvalidConfiguration {
            option: raw.to_string(),
        })
    }
}

impl fmt::Display for SyncOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => f.write_str(CONTINUE_OPTION),
            Self::FromBuild(version) => write!(f, "FROM_BUILD_{}", version.folder_name()),
        }
    }
}

/// Configuration for one engine run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root directory containing build folders.
    pub base_path: PathBuf,
    /// Where to start.
    pub option: SyncOption,
    /// Line to resume at with `FromBuild`; 0 runs the whole build onward.
    pub start_line: u64,
}

impl SyncConfig {
    /// Build a configuration from raw option text.
    ///
    /// # Errors
    ///
    /// Propagates [`SyncOption::parse`] failures.
    pub fn new(base_path: impl Into<PathBuf>, option: &str, start_line: u64) -> Result<Self> {
        Ok(Self {
            base_path: base_path.into(),
            option: SyncOption::parse(option)?,
            start_line,
        })
    }
}

/// Resolve the target database path.
///
/// # Errors
///
/// Returns `NotConfigured` when no path was given.
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
    explicit_path
        .map(Path::to_path_buf)
        .ok_or(Error::NotConfigured)
}

/// File name of the per-run log (`sync-YYYY-mm-dd_HH-MM-SS.log`).
#[must_use]
pub fn log_file_name(started_at: DateTime<Local>) -> String {
    format!("sync-{}.log", started_at.format("%Y-%m-%d_%H-%M-%S"))
}
