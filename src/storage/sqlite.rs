//! SQLite target database.
//!
//! One connection serves both roles: it runs the setup scripts and it holds
//! the progress log, so a checkpoint and the data it describes share a
//! database.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::engine::{ExecutionError, SqlExecutor};
use crate::error::{Error, Result};
use crate::model::{BuildVersion, SyncCheckpoint};
use crate::storage::progress::ProgressStore;
use crate::storage::schema::apply_schema;

/// Default busy timeout when none is configured.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Raw progress row before domain conversion.
type CheckpointRow = (i64, String, i64, i64);

/// SQLite-backed target database and progress store.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open a database at the given path, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(
            timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        ))?;

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn to_checkpoint((id, label, line, finished_ms): CheckpointRow) -> Result<SyncCheckpoint> {
        let line = u64::try_from(line)
            .map_err(|_| Error::Other(format!("Checkpoint {id} has negative line {line}")))?;
        let finished_at = DateTime::from_timestamp_millis(finished_ms).ok_or_else(|| {
            Error::Other(format!("Checkpoint {id} has invalid timestamp {finished_ms}"))
        })?;

        Ok(SyncCheckpoint {
            id,
            build_version: BuildVersion::parse(&label)?,
            line,
            finished_at,
        })
    }
}

impl ProgressStore for SqliteStorage {
    fn ensure_schema(&self) -> Result<()> {
        apply_schema(&self.conn)?;
        Ok(())
    }

    fn latest_checkpoint(&self) -> Result<Option<SyncCheckpoint>> {
        let row: Option<CheckpointRow> = self
            .conn
            .query_row(
                "SELECT id, build_version, line, sync_finished_at
                 FROM build_sync_log
                 ORDER BY sync_finished_at DESC, id DESC
                 LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        row.map(Self::to_checkpoint).transpose()
    }

    fn append_checkpoint(
        &self,
        version: &BuildVersion,
        line: u64,
        finished_at: DateTime<Utc>,
    ) -> Result<SyncCheckpoint> {
        let stored_line = i64::try_from(line)
            .map_err(|_| Error::Other(format!("Line {line} does not fit the progress log")))?;

        self.conn.execute(
            "INSERT INTO build_sync_log (build_version, line, sync_finished_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![version.label(), stored_line, finished_at.timestamp_millis()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, build = %version, line, "Checkpoint appended");

        // Millisecond precision is what the store keeps.
        let finished_at = DateTime::from_timestamp_millis(finished_at.timestamp_millis())
            .unwrap_or(finished_at);

        Ok(SyncCheckpoint {
            id,
            build_version: version.clone(),
            line,
            finished_at,
        })
    }

    fn history(&self, limit: usize) -> Result<Vec<SyncCheckpoint>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "SELECT id, build_version, line, sync_finished_at
             FROM build_sync_log
             ORDER BY sync_finished_at DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt
            .query_map([limit], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<std::result::Result<Vec<CheckpointRow>, _>>()?;

        rows.into_iter().map(Self::to_checkpoint).collect()
    }
}

impl SqlExecutor for SqliteStorage {
    fn execute(&self, sql: &str) -> std::result::Result<(), ExecutionError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| ExecutionError::new(e.to_string()))
    }
}
