//! Storage layer for sqlsync.
//!
//! The target database doubles as the progress store:
//! - Setup scripts run against it through [`crate::engine::SqlExecutor`]
//! - The `build_sync_log` table records one checkpoint per run
//!
//! # Submodules
//!
//! - [`progress`] - The progress store contract
//! - [`schema`] - Progress log DDL
//! - [`sqlite`] - SQLite implementation of both roles

pub mod progress;
pub mod schema;
pub mod sqlite;

pub use progress::ProgressStore;
pub use sqlite::{SqliteStorage, DEFAULT_BUSY_TIMEOUT_MS};
