//! sqlsync CLI entry point.

use clap::Parser;
use sqlsync::cli::commands;
use sqlsync::cli::{Cli, Commands};
use sqlsync::config::log_file_name;
use sqlsync::error::Error;
use std::fs::{self, File};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Resolve effective JSON mode: --json OR non-TTY stdout
    let json = cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    let result = init_tracing(cli.verbose, cli.quiet, cli.log_dir.as_deref())
        .map_err(Error::from)
        .and_then(|()| run(&cli, json));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Directive for a verbosity level, never quieter than `floor`.
fn verbosity_directive(verbose: u8, floor: u8) -> &'static str {
    match verbose.max(floor) {
        0 => "warn",
        1 => "info",
        2 => "debug,rusqlite=info",
        _ => "trace",
    }
}

fn filter_for(verbose: u8, floor: u8) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    // Honor RUST_LOG if set, otherwise use verbosity flag
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(verbosity_directive(verbose, floor))
    }
}

/// Install the stderr layer and, with `--log-dir`, a per-run log file.
///
/// The log file records at least `info` so every run leaves a trace of where
/// it started and which checkpoint it wrote.
fn init_tracing(verbose: u8, quiet: bool, log_dir: Option<&Path>) -> std::io::Result<()> {
    use tracing_subscriber::{fmt, prelude::*};

    let stderr_layer = (!quiet).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_filter(filter_for(verbose, 0))
    });

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let file = File::create(dir.join(log_file_name(chrono::Local::now())))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(filter_for(verbose, 1)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let db = cli.db.as_ref();
    let timeout = cli.busy_timeout_ms;

    match &cli.command {
        Commands::Run(args) => commands::run::execute(args, db, timeout, json),
        Commands::Status { base_path } => {
            commands::status::execute(db, timeout, base_path.as_ref(), json)
        }
        Commands::History { limit } => commands::history::execute(db, timeout, *limit, json),
        Commands::Builds { base_path, from } => {
            commands::builds::execute(base_path, from.as_deref(), json)
        }
        Commands::Init => commands::init::execute(db, timeout, json),
        Commands::Version => commands::version::execute(json),
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
