//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// sqlsync - Resumable build-folder SQL synchronizer
#[derive(Parser, Debug)]
#[command(name = "sqlsync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Target database path
    #[arg(long, global = true, env = "SQLSYNC_DB")]
    pub db: Option<PathBuf>,

    /// Busy timeout for the target database in milliseconds (default: 5000)
    #[arg(long, global = true, env = "SQLSYNC_BUSY_TIMEOUT_MS")]
    pub busy_timeout_ms: Option<u64>,

    /// Also write logs to <dir>/sync-<timestamp>.log
    #[arg(long, global = true, env = "SQLSYNC_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending build scripts and record a checkpoint
    Run(RunArgs),

    /// Show the latest checkpoint and what a run would do next
    Status {
        /// Root directory containing build folders
        #[arg(long, env = "SQLSYNC_BASE_PATH")]
        base_path: Option<PathBuf>,
    },

    /// List recorded checkpoints, newest first
    History {
        /// Maximum number of checkpoints to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// List setup scripts a full sync would execute, in order
    Builds {
        /// Root directory containing build folders
        #[arg(long, env = "SQLSYNC_BASE_PATH")]
        base_path: PathBuf,

        /// First build to include (e.g. B12)
        #[arg(long)]
        from: Option<String>,
    },

    /// Create the progress log in the target database
    Init,

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `sqlsync run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Root directory containing build folders (B12, B13, ...)
    #[arg(long, env = "SQLSYNC_BASE_PATH")]
    pub base_path: PathBuf,

    /// CONTINUE, or FROM_BUILD_B<n> to start at a specific build
    #[arg(long, env = "SQLSYNC_OPTION", default_value = "")]
    pub option: String,

    /// Line to resume at with FROM_BUILD_B<n> (0 runs the whole build)
    #[arg(long, env = "SQLSYNC_START_LINE", default_value = "0")]
    pub start_line: u64,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
