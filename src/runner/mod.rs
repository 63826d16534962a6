//! One complete run: validate, scan, resolve, act.
//!
//! # Example
//!
//! ```no_run
//! use dupremover::duplicates::Mode;
//! use dupremover::progress::LogProgress;
//! use dupremover::runner::{RunConfig, Runner};
//! use std::sync::Arc;
//!
//! let config = RunConfig::new("/photos")
//!     .with_root_b("/backup")
//!     .with_mode(Mode::AvsB);
//!
//! let result = Runner::new(config)
//!     .with_progress_callback(Arc::new(LogProgress))
//!     .run()
//!     .unwrap();
//! println!("{}", result.summary());
//! ```

pub mod config;
pub mod result;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub use config::{RunConfig, ValidatedRoots};
pub use result::{CandidateReport, ErrorEntry, ErrorKind, RunResult};

use crate::actions::{apply_actions, ActionPlan, ActionReport};
use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError, Mode};
use crate::progress::ProgressCallback;

/// Errors that stop a run before any file is touched.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    /// The configuration is unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A root does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// A root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The mode compares two roots but directory B is missing.
    #[error("Mode '{0}' requires directory B")]
    MissingRootB(Mode),

    /// A and B are the same directory.
    #[error("Directory A and directory B are the same: {0}")]
    SameRoots(PathBuf),

    /// A recursive scan of one root would include the other.
    #[error("Directories overlap in a recursive scan: {a} and {b}")]
    OverlappingRoots {
        /// Directory A
        a: PathBuf,
        /// Directory B
        b: PathBuf,
    },

    /// Delete was requested without confirmation.
    #[error("Permanent deletion requires explicit confirmation")]
    DeleteNotConfirmed,

    /// The run was interrupted before any file was touched.
    #[error("Run interrupted by user")]
    Interrupted,
}

impl RunError {
    /// Returns true for configuration problems, false for interruption.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Self::Interrupted)
    }
}

impl From<FinderError> for RunError {
    fn from(e: FinderError) -> Self {
        match e {
            FinderError::Interrupted => Self::Interrupted,
            FinderError::PathNotFound(p) => Self::PathNotFound(p),
            FinderError::NotADirectory(p) => Self::NotADirectory(p),
            FinderError::MissingRootB(mode) => Self::MissingRootB(mode),
        }
    }
}

/// Runs one configuration to completion.
pub struct Runner {
    config: RunConfig,
    progress: Option<Arc<dyn ProgressCallback>>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Runner {
    /// Create a runner for `config`.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            progress: None,
            shutdown_flag: None,
        }
    }

    /// Receive progress and log lines.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Cancel cooperatively once `flag` is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The configuration being run.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn message(&self, line: &str) {
        if let Some(ref cb) = self.progress {
            cb.on_message(line);
        }
    }

    /// Validate, scan, resolve and act.
    ///
    /// Per-file problems end up in [`RunResult::errors`]; only problems that
    /// prevent the run from starting, or an interruption before the action
    /// phase, are returned as errors.
    ///
    /// # Errors
    ///
    /// Any [`RunError`]. Nothing on disk has changed when one is returned.
    pub fn run(&self) -> Result<RunResult, RunError> {
        let start = Instant::now();
        let config = &self.config;
        let roots = config.validate()?;
        if self.is_shutdown_requested() {
            return Err(RunError::Interrupted);
        }

        self.message(&format!("Mode: {}", config.mode.description()));
        if config.mode.requires_root_b() {
            for (origin, role) in [
                (config.mode.kept_origin(), "keep"),
                (config.mode.removal_origin(), "remove"),
            ] {
                if let Some(root) = roots.root(origin) {
                    self.message(&format!("{origin} ({role}): {}", root.display()));
                }
            }
        } else {
            self.message(&format!("A: {}", roots.a.display()));
        }
        self.message(&format!(
            "Recursive scan: {}",
            if config.recursive { "ON" } else { "OFF" }
        ));
        if config.dry_run {
            self.message("Dry run: no files will be changed");
        }

        let mut finder_config = FinderConfig::default().with_walker_config(config.walker_config());
        if let Some(ref flag) = self.shutdown_flag {
            finder_config = finder_config.with_shutdown_flag(flag.clone());
        }
        if let Some(ref cb) = self.progress {
            finder_config = finder_config.with_progress_callback(cb.clone());
        }

        let (resolution, summary) =
            DuplicateFinder::new(finder_config).find(config.mode, &roots.a, roots.b.as_deref())?;

        let candidates = resolution.candidates();
        let found = candidates.len();
        let report = if candidates.is_empty() {
            self.message("No duplicates found.");
            ActionReport::default()
        } else {
            let plan = ActionPlan::new(config.action, roots.removal_root(config.mode))
                .with_dry_run(config.dry_run);
            apply_actions(
                &candidates,
                &plan,
                self.progress.as_deref(),
                self.shutdown_flag.as_deref(),
            )
        };

        let errors = summary
            .scan_errors
            .iter()
            .map(ErrorEntry::from)
            .chain(report.errors.iter().map(ErrorEntry::from))
            .collect();

        let result = RunResult {
            mode: config.mode,
            action: config.action,
            dry_run: config.dry_run,
            scanned_count: summary.total_files,
            duplicate_group_count: summary.duplicate_groups,
            candidates: report
                .records
                .into_iter()
                .map(|r| CandidateReport::from_record(r, config.action))
                .collect(),
            bytes_reclaimed: report.bytes_reclaimed,
            errors,
            interrupted: report.interrupted,
            quarantine_dir: report.quarantine_dir,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        self.message(&format!("Done. Duplicates found: {found}"));
        log::info!("{}", result.summary());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, ActionOutcome};
    use crate::progress::ChannelProgress;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    #[test]
    fn test_run_within_moves_duplicates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "X").unwrap();
        fs::write(dir.path().join("b.txt"), "X").unwrap();
        fs::write(dir.path().join("c.txt"), "Y").unwrap();

        let result = Runner::new(RunConfig::new(dir.path())).run().unwrap();

        assert_eq!(result.scanned_count, 3);
        assert_eq!(result.duplicate_group_count, 1);
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.moved_count(), 1);
        assert_eq!(result.bytes_reclaimed, 1);
        assert!(dir.path().join("a.txt").exists());
        assert!(!dir.path().join("b.txt").exists());
        assert!(dir.path().join("c.txt").exists());
        assert!(matches!(
            result.candidates[0].outcome,
            ActionOutcome::Moved { .. }
        ));
    }

    #[test]
    fn test_run_sends_log_lines() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "X").unwrap();
        fs::write(dir.path().join("b"), "X").unwrap();

        let (tx, rx) = mpsc::channel();
        Runner::new(RunConfig::new(dir.path()).with_dry_run(true))
            .with_progress_callback(Arc::new(ChannelProgress::new(tx)))
            .run()
            .unwrap();

        let lines: Vec<String> = rx.try_iter().collect();
        let root = dir.path().canonicalize().unwrap();
        assert!(lines.iter().any(|l| *l == format!("A: {}", root.display())));
        assert!(lines.iter().any(|l| l == "Recursive scan: ON"));
        assert!(lines.iter().any(|l| l.starts_with("[DUP]")));
        assert!(lines.iter().any(|l| l.starts_with("[DRY]")));
        assert_eq!(lines.last().unwrap(), "Done. Duplicates found: 1");
    }

    #[test]
    fn test_run_header_names_kept_and_removed_roots() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        fs::write(a.path().join("x"), "X").unwrap();
        fs::write(b.path().join("y"), "X").unwrap();
        fs::write(b.path().join("z"), "X").unwrap();
        let a_root = a.path().canonicalize().unwrap();
        let b_root = b.path().canonicalize().unwrap();

        let (tx, rx) = mpsc::channel();
        Runner::new(
            RunConfig::new(a.path())
                .with_root_b(b.path())
                .with_mode(Mode::BvsA)
                .with_dry_run(true),
        )
        .with_progress_callback(Arc::new(ChannelProgress::new(tx)))
        .run()
        .unwrap();

        let lines: Vec<String> = rx.try_iter().collect();
        let keep = lines
            .iter()
            .position(|l| *l == format!("B (keep): {}", b_root.display()))
            .unwrap();
        let remove = lines
            .iter()
            .position(|l| *l == format!("A (remove): {}", a_root.display()))
            .unwrap();
        assert_eq!(lines[0], "Mode: B vs A (remove from A)");
        assert!(keep < remove);
        assert_eq!(lines.last().unwrap(), "Done. Duplicates found: 1");
    }

    #[test]
    fn test_run_without_duplicates_still_reports_done() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "1").unwrap();

        let (tx, rx) = mpsc::channel();
        Runner::new(RunConfig::new(dir.path()))
            .with_progress_callback(Arc::new(ChannelProgress::new(tx)))
            .run()
            .unwrap();

        let lines: Vec<String> = rx.try_iter().collect();
        assert!(lines.iter().any(|l| l == "No duplicates found."));
        assert_eq!(lines.last().unwrap(), "Done. Duplicates found: 0");
    }

    #[test]
    fn test_run_unconfirmed_delete_fails_before_scanning() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "X").unwrap();
        fs::write(dir.path().join("b"), "X").unwrap();

        let err = Runner::new(RunConfig::new(dir.path()).with_action(Action::Delete))
            .run()
            .unwrap_err();

        assert!(matches!(err, RunError::DeleteNotConfirmed));
        assert!(err.is_invalid_input());
        assert!(dir.path().join("b").exists());
    }

    #[test]
    fn test_run_interrupted_before_start() {
        let dir = TempDir::new().unwrap();
        let err = Runner::new(RunConfig::new(dir.path()))
            .with_shutdown_flag(Arc::new(AtomicBool::new(true)))
            .run()
            .unwrap_err();

        assert!(matches!(err, RunError::Interrupted));
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_run_no_duplicates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "1").unwrap();

        let result = Runner::new(RunConfig::new(dir.path())).run().unwrap();
        assert!(result.is_empty());
        assert!(result.quarantine_dir.is_none());
        assert!(!dir.path().join(crate::scanner::QUARANTINE_DIR_NAME).exists());
    }

    #[test]
    fn test_finder_error_conversion() {
        assert!(matches!(
            RunError::from(FinderError::Interrupted),
            RunError::Interrupted
        ));
        assert!(matches!(
            RunError::from(FinderError::MissingRootB(Mode::AvsB)),
            RunError::MissingRootB(Mode::AvsB)
        ));
    }
}
