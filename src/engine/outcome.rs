//! Run outcomes.

use std::path::PathBuf;

use serde::Serialize;

use crate::model::{BuildVersion, SyncCheckpoint};

/// Why a run did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `CONTINUE` with an empty progress log.
    NoPreviousSync,
}

/// A script the database rejected during a full-build pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptFailure {
    pub script: PathBuf,
    pub version: BuildVersion,
    pub message: String,
}

/// Where a run starts, decided from configuration and the last checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StartPoint {
    /// Run the rest of a partially applied build from `line`.
    Resume { version: BuildVersion, line: u64 },
    /// Run `version` and every later build from scratch.
    Fresh { version: BuildVersion },
    /// The last checkpoint covers its build and no next build is runnable.
    NothingLeft { checkpoint: SyncCheckpoint },
    /// No checkpoint to continue from.
    NoPreviousSync,
}

/// Terminal state of one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Nothing ran and nothing was recorded.
    Skipped { reason: SkipReason },
    /// Everything attempted was applied; a checkpoint was appended.
    Completed { checkpoint: SyncCheckpoint },
    /// Already at the latest build; the existing checkpoint stands.
    UpToDate { checkpoint: SyncCheckpoint },
    /// A full-build pass stopped at a rejected script; the appended
    /// checkpoint holds the last script that did apply.
    Halted {
        checkpoint: SyncCheckpoint,
        failure: ScriptFailure,
    },
}

impl SyncOutcome {
    /// The checkpoint this outcome reports, if any.
    #[must_use]
    pub const fn checkpoint(&self) -> Option<&SyncCheckpoint> {
        match self {
            Self::Skipped { .. } => None,
            Self::Completed { checkpoint }
            | Self::UpToDate { checkpoint }
            | Self::Halted { checkpoint, .. } => Some(checkpoint),
        }
    }

    /// Whether this run appended a checkpoint.
    #[must_use]
    pub const fn wrote_checkpoint(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Halted { .. })
    }

    /// Whether the run stopped on a rejected script.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        matches!(self, Self::Halted { .. })
    }
}

/// Position reached by a full-build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProgress {
    /// Last build applied in full (or the starting build if none was).
    pub version: BuildVersion,
    /// Line count of that build's script (0 if none applied).
    pub line: u64,
    /// The script that stopped the pass, if one did.
    pub failure: Option<ScriptFailure>,
}

impl BuildProgress {
    /// Progress for a build applied up to `line`, with no failure.
    #[must_use]
    pub fn applied(version: BuildVersion, line: u64) -> Self {
        Self {
            version,
            line,
            failure: None,
        }
    }
}
