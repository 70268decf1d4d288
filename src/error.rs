//! Error types for sqlsync.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 4=input, 6=execution, 7=config, 8=io)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sqlsync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    DatabaseNotFound,
    DatabaseError,

    // Input (exit 4)
    MalformedVersion,
    InvalidBuild,
    LineOutOfRange,

    // Execution (exit 6)
    ExecutionFailure,

    // Config (exit 7)
    InvalidConfiguration,
    NotConfigured,

    // I/O (exit 8)
    IoFailure,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::MalformedVersion => "MALFORMED_VERSION",
            Self::InvalidBuild => "INVALID_BUILD",
            Self::LineOutOfRange => "LINE_OUT_OF_RANGE",
            Self::ExecutionFailure => "EXECUTION_FAILURE",
            Self::InvalidConfiguration => "INVALID_CONFIGURATION",
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::IoFailure => "IO_FAILURE",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::DatabaseNotFound | Self::DatabaseError => 2,
            Self::MalformedVersion | Self::InvalidBuild | Self::LineOutOfRange => 4,
            Self::ExecutionFailure => 6,
            Self::InvalidConfiguration | Self::NotConfigured => 7,
            Self::IoFailure | Self::JsonError => 8,
        }
    }

    /// Whether re-running with corrected input can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidBuild
                | Self::LineOutOfRange
                | Self::InvalidConfiguration
                | Self::NotConfigured
                | Self::ExecutionFailure
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur during a sync run or a CLI command.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid sync option '{option}', valid options are: CONTINUE, FROM_BUILD_Bxx")]
    InvalidConfiguration { option: String },

    #[error("No database configured: pass --db or set SQLSYNC_DB")]
    NotConfigured,

    #[error("Database not found: {}", path.display())]
    DatabaseNotFound { path: PathBuf },

    #[error("No number found in '{input}'")]
    MalformedVersion { input: String },

    #[error("Invalid build: {version}")]
    InvalidBuild { version: String },

    #[error("Start line {line} exceeds {} ({total} lines), nothing to run", path.display())]
    LineOutOfRange {
        path: PathBuf,
        line: u64,
        total: u64,
    },

    #[error("Failed to read {}: {source}", path.display())]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Execution of {target} failed: {message}")]
    Execution { target: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfiguration { .. } => ErrorCode::InvalidConfiguration,
            Self::NotConfigured => ErrorCode::NotConfigured,
            Self::DatabaseNotFound { .. } => ErrorCode::DatabaseNotFound,
            Self::MalformedVersion { .. } => ErrorCode::MalformedVersion,
            Self::InvalidBuild { .. } => ErrorCode::InvalidBuild,
            Self::LineOutOfRange { .. } => ErrorCode::LineOutOfRange,
            Self::ScriptRead { .. } | Self::Walk { .. } | Self::Io(_) => ErrorCode::IoFailure,
            Self::Execution { .. } => ErrorCode::ExecutionFailure,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for operators.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::InvalidConfiguration { .. } => Some(
                "Use --option CONTINUE to resume, or --option FROM_BUILD_B<n> [--start-line N] \
                 to start from a specific build"
                    .to_string(),
            ),

            Self::NotConfigured => {
                Some("Point at the target database: sqlsync --db <path> <command>".to_string())
            }

            Self::DatabaseNotFound { path } => Some(format!(
                "Create the progress log first: sqlsync --db {} init",
                path.display()
            )),

            Self::InvalidBuild { version } => Some(format!(
                "Build folder '{}' must exist under the base path and contain 2.data_setup.sql. \
                 Use `sqlsync builds` to list available scripts.",
                version.to_uppercase()
            )),

            Self::LineOutOfRange { total, .. } => Some(format!(
                "The script has {total} lines. Use a start line between 1 and {total}, \
                 or 0 to run the whole build."
            )),

            Self::Execution { .. } => Some(
                "Fix the failing script, then re-run with --option CONTINUE. \
                 Use `sqlsync status` to see the last recorded checkpoint."
                    .to_string(),
            ),

            Self::MalformedVersion { .. }
            | Self::ScriptRead { .. }
            | Self::Walk { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
