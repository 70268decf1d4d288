//! SQL execution capability.

use thiserror::Error;

/// A rejected batch, carrying the database's own message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Executes opaque SQL text as one batch.
///
/// Each call is all-or-nothing from the engine's point of view; the engine
/// never retries or splits a batch. Blocking: timeouts belong to the
/// implementation.
pub trait SqlExecutor {
    /// Execute `sql` as a single batch.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` if the database rejects the batch.
    fn execute(&self, sql: &str) -> std::result::Result<(), ExecutionError>;
}
