//! The sync engine.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::build::{line_count, read_suffix_from, read_whole, BuildLocator};
use crate::config::{SyncConfig, SyncOption};
use crate::engine::executor::SqlExecutor;
use crate::engine::outcome::{
    BuildProgress, ScriptFailure, SkipReason, StartPoint, SyncOutcome,
};
use crate::error::{Error, Result};
use crate::model::BuildVersion;
use crate::storage::ProgressStore;

/// Drives one sync run against an executor and a progress store.
///
/// The engine holds no state between runs; the progress store is the only
/// memory. At most one engine may run against a given store at a time.
pub struct SyncEngine<'a, E, S> {
    config: SyncConfig,
    locator: BuildLocator,
    executor: &'a E,
    store: &'a S,
}

impl<'a, E, S> SyncEngine<'a, E, S>
where
    E: SqlExecutor,
    S: ProgressStore,
{
    /// Create an engine for `config`.
    pub fn new(config: SyncConfig, executor: &'a E, store: &'a S) -> Self {
        let locator = BuildLocator::new(config.base_path.clone());
        Self {
            config,
            locator,
            executor,
            store,
        }
    }

    /// The locator rooted at the configured base path.
    #[must_use]
    pub fn locator(&self) -> &BuildLocator {
        &self.locator
    }

    /// Perform one run.
    ///
    /// # Errors
    ///
    /// Returns the fatal kinds (`InvalidBuild`, `MalformedVersion`,
    /// `LineOutOfRange`, I/O and store failures, and execution failures while
    /// resuming mid-script). No checkpoint is written on any of them.
    pub fn run(&self) -> Result<SyncOutcome> {
        info!(
            base_path = %self.config.base_path.display(),
            option = %self.config.option,
            start_line = self.config.start_line,
            "Start sync"
        );

        match self.resolve_start()? {
            StartPoint::NoPreviousSync => {
                warn!(
                    "No previous sync found; use FROM_BUILD_Bxx with a start line to begin. Exiting"
                );
                Ok(SyncOutcome::Skipped {
                    reason: SkipReason::NoPreviousSync,
                })
            }
            StartPoint::NothingLeft { checkpoint } => {
                info!(
                    build = %checkpoint.build_version,
                    line = checkpoint.line,
                    "Nothing was left, all updated"
                );
                Ok(SyncOutcome::UpToDate { checkpoint })
            }
            StartPoint::Fresh { version } => {
                let progress = self.sync_from_build(&version)?;
                self.record(progress)
            }
            StartPoint::Resume { version, line } => self.resume(&version, line),
        }
    }

    /// Decide where a run starts without executing anything.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBuild` when an explicitly requested build is not
    /// runnable, and read failures for the checkpointed build's script.
    pub fn resolve_start(&self) -> Result<StartPoint> {
        match &self.config.option {
            SyncOption::Continue => {
                debug!("Continuing sync");
                let Some(checkpoint) = self.store.latest_checkpoint()? else {
                    return Ok(StartPoint::NoPreviousSync);
                };

                let total = line_count(&self.locator.script_path(&checkpoint.build_version))?;
                if !checkpoint.is_complete(total) {
                    return Ok(StartPoint::Resume {
                        version: checkpoint.build_version.clone(),
                        line: checkpoint.resume_line(),
                    });
                }

                let next = checkpoint.build_version.next()?;
                if self.locator.is_runnable(&next) {
                    Ok(StartPoint::Fresh { version: next })
                } else {
                    Ok(StartPoint::NothingLeft { checkpoint })
                }
            }
            SyncOption::FromBuild(version) => {
                if !self.locator.is_runnable(version) {
                    return Err(Error::InvalidBuild {
                        version: version.label().to_string(),
                    });
                }

                if self.config.start_line == 0 {
                    Ok(StartPoint::Fresh {
                        version: version.clone(),
                    })
                } else {
                    Ok(StartPoint::Resume {
                        version: version.clone(),
                        line: self.config.start_line,
                    })
                }
            }
        }
    }

    /// Finish a build from `line`, then move on to the next build if any.
    fn resume(&self, version: &BuildVersion, line: u64) -> Result<SyncOutcome> {
        let last_line = self.sync_the_rest(version, line)?;
        info!(build = %version, "Sync of the rest finished, checking for a new build");

        let next = version.next()?;
        if !self.locator.is_runnable(&next) {
            info!(build = %version, line = last_line, "Nothing was left, sync success");
            return self.record(BuildProgress::applied(version.clone(), last_line));
        }

        let progress = self.sync_from_build(&next)?;
        self.record(progress)
    }

    /// Execute a build's script from `from_line` to the end as one batch.
    ///
    /// Returns the script's total line count.
    ///
    /// # Errors
    ///
    /// Returns `LineOutOfRange` when `from_line` is past the end, and
    /// `Execution` when the database rejects the batch. Both are fatal.
    pub fn sync_the_rest(&self, version: &BuildVersion, from_line: u64) -> Result<u64> {
        let path = self.locator.script_path(version);
        let sql = read_suffix_from(&path, from_line)?;
        let total = line_count(&path)?;

        info!(build = %version, from_line, total, "Executing rest of build");
        self.executor.execute(&sql).map_err(|e| {
            error!(build = %version, from_line, cause = %e, "Resume failed");
            Error::Execution {
                target: format!("{} from line {from_line}", version.folder_name()),
                message: e.message,
            }
        })?;

        Ok(total)
    }

    /// Execute every script at or after `version`, in ascending order.
    ///
    /// Stops at the first script the database rejects and reports the last
    /// script that did apply. With nothing to run, reports `(version, 0)`.
    ///
    /// # Errors
    ///
    /// Returns discovery and read failures. Execution failures are not
    /// errors here; they end up in [`BuildProgress::failure`].
    pub fn sync_from_build(&self, version: &BuildVersion) -> Result<BuildProgress> {
        let scripts = self.locator.discover_from(version.ordinal())?;
        let mut progress = BuildProgress::applied(version.clone(), 0);

        for script in scripts {
            info!(script = %script.path.display(), build = %script.version, "Executing");
            let sql = read_whole(&script.path)?;

            if let Err(e) = self.executor.execute(&sql) {
                error!(
                    build = %progress.version,
                    line = progress.line,
                    failed = %script.version,
                    cause = %e,
                    "Sync stopped"
                );
                progress.failure = Some(ScriptFailure {
                    script: script.path,
                    version: script.version,
                    message: e.message,
                });
                return Ok(progress);
            }

            progress.line = line_count(&script.path)?;
            progress.version = script.version;
            debug!(build = %progress.version, line = progress.line, "Applied");
        }

        Ok(progress)
    }

    /// Append the run's single checkpoint.
    fn record(&self, progress: BuildProgress) -> Result<SyncOutcome> {
        let checkpoint =
            self.store
                .append_checkpoint(&progress.version, progress.line, Utc::now())?;
        info!(
            id = checkpoint.id,
            build = %checkpoint.build_version,
            line = checkpoint.line,
            "Sync finished, checkpoint stored"
        );

        Ok(match progress.failure {
            Some(failure) => SyncOutcome::Halted {
                checkpoint,
                failure,
            },
            None => SyncOutcome::Completed { checkpoint },
        })
    }
}
