//! Command implementations.

pub mod builds;
pub mod completions;
pub mod history;
pub mod init;
pub mod run;
pub mod status;
pub mod version;

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use std::path::PathBuf;

/// Open the target database named by `--db`.
///
/// Read-only commands pass `must_exist` so a typo in the path reports an
/// error instead of creating an empty database.
pub(crate) fn open_target(
    db_path: Option<&PathBuf>,
    busy_timeout_ms: Option<u64>,
    must_exist: bool,
) -> Result<SqliteStorage> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path))?;

    if must_exist && !db_path.exists() {
        return Err(Error::DatabaseNotFound { path: db_path });
    }

    SqliteStorage::open_with_timeout(&db_path, busy_timeout_ms)
}

/// Format a checkpoint timestamp for humans.
pub(crate) fn format_time(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
