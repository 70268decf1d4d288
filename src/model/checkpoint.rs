//! Sync checkpoint model.
//!
//! A checkpoint records the furthest confirmed progress of one engine run:
//! the build whose script was applied up to and including `line`. Line 0
//! means nothing of that build has run yet through a full-build execution.
//! Checkpoints are append-only; the newest by `finished_at` wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::BuildVersion;

/// A persisted synchronization checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCheckpoint {
    /// Row identifier assigned by the store
    pub id: i64,

    /// Build whose script was applied
    pub build_version: BuildVersion,

    /// Last applied line (1-indexed), 0 if none
    pub line: u64,

    /// When the run that wrote this checkpoint finished
    pub finished_at: DateTime<Utc>,
}

impl SyncCheckpoint {
    /// Line to resume from within the same build.
    #[must_use]
    pub const fn resume_line(&self) -> u64 {
        self.line + 1
    }

    /// Whether this checkpoint covers a script of `total_lines` completely.
    #[must_use]
    pub const fn is_complete(&self, total_lines: u64) -> bool {
        self.line == total_lines
    }
}
