//! Resumable sync engine.
//!
//! One run is one linear, blocking pass:
//!
//! 1. **Resolve** where to start from the configured option and the last
//!    checkpoint ([`StartPoint`])
//! 2. **Resume** a partially applied build from a line, or **start fresh**
//!    at a build
//! 3. **Advance** through later builds in ascending order, each script as one
//!    batch, stopping at the first rejected script
//! 4. **Checkpoint** the last good position (exactly one row per run that
//!    gets this far)
//!
//! Failures resuming mid-script abort the run without a checkpoint. Failures
//! inside the full-build pass are recorded and surfaced as
//! [`SyncOutcome::Halted`].

mod executor;
mod outcome;
mod sync;

pub use executor::{ExecutionError, SqlExecutor};
pub use outcome::{BuildProgress, ScriptFailure, SkipReason, StartPoint, SyncOutcome};
pub use sync::SyncEngine;
