//! Progress log schema.
//!
//! The progress log lives in the target database next to the tables the
//! setup scripts create. One row is appended per engine run; rows are never
//! updated or deleted.

use rusqlite::{Connection, Result};

/// Name of the progress log table.
pub const SYNC_LOG_TABLE: &str = "build_sync_log";

/// DDL for the progress log.
///
/// Timestamps are stored as INTEGER (Unix milliseconds).
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS build_sync_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    build_version TEXT NOT NULL,
    line INTEGER NOT NULL CHECK (line >= 0),
    sync_finished_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_build_sync_log_finished
    ON build_sync_log(sync_finished_at DESC, id DESC);
";

/// Create the progress log if it does not exist yet.
///
/// Connection pragmas are left alone: the connection is shared with the setup
/// scripts and must behave the way they expect.
///
/// # Errors
///
/// Returns an error if the SQL execution fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
