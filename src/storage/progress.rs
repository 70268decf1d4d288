//! Progress store contract.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{BuildVersion, SyncCheckpoint};

/// Append-only history of sync checkpoints.
///
/// Implementations hold no in-memory cache: every read reflects what is
/// persisted.
pub trait ProgressStore {
    /// Provision the underlying storage. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be created.
    fn ensure_schema(&self) -> Result<()>;

    /// The most recent checkpoint by finish time, if any run has completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn latest_checkpoint(&self) -> Result<Option<SyncCheckpoint>>;

    /// Append a checkpoint and return it as persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn append_checkpoint(
        &self,
        version: &BuildVersion,
        line: u64,
        finished_at: DateTime<Utc>,
    ) -> Result<SyncCheckpoint>;

    /// Up to `limit` checkpoints, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn history(&self, limit: usize) -> Result<Vec<SyncCheckpoint>>;
}
