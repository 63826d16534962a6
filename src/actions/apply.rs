//! Apply a move or delete action to resolved candidates.
//!
//! Candidates are processed in order. Each one gets exactly one
//! [`ActionOutcome`]; a failure is recorded and processing continues.
//! Once shutdown is requested, every remaining candidate is reported as
//! skipped.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use super::delete::{permanent_delete, FileSnapshot};
use super::quarantine::{ensure_quarantine_dir, move_to_quarantine};
use super::{Action, ActionError, ActionOutcome};
use crate::duplicates::Candidate;
use crate::progress::{ProgressCallback, PHASE_ACTION};

/// Skip reason for a dry run.
pub const SKIP_DRY_RUN: &str = "dry run";
/// Skip reason once shutdown was requested.
pub const SKIP_INTERRUPTED: &str = "interrupted";

/// How to act on candidates.
#[derive(Debug, Clone)]
pub struct ActionPlan {
    /// Move or delete
    pub action: Action,
    /// Root hosting the quarantine folder (used by [`Action::Move`])
    pub quarantine_root: PathBuf,
    /// Report what would happen without touching anything
    pub dry_run: bool,
}

impl ActionPlan {
    /// Create a plan.
    #[must_use]
    pub fn new(action: Action, quarantine_root: &Path) -> Self {
        Self {
            action,
            quarantine_root: quarantine_root.to_path_buf(),
            dry_run: false,
        }
    }

    /// Enable or disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome for a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    /// Candidate path
    pub path: PathBuf,
    /// Keeper of the candidate's group
    pub keeper: PathBuf,
    /// Candidate size in bytes
    pub size: u64,
    /// What happened
    pub outcome: ActionOutcome,
}

/// Result of applying an action to a candidate list.
#[derive(Debug, Default)]
pub struct ActionReport {
    /// One record per candidate, in input order
    pub records: Vec<ActionRecord>,
    /// Errors behind every failed record
    pub errors: Vec<ActionError>,
    /// Sum of sizes of moved or deleted candidates
    pub bytes_reclaimed: u64,
    /// Quarantine folder, if one was created or reused
    pub quarantine_dir: Option<PathBuf>,
    /// Shutdown was requested before every candidate was handled
    pub interrupted: bool,
}

impl ActionReport {
    /// Number of candidates moved or deleted.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_success()).count()
    }

    /// Number of candidates whose action failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }

    /// Human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} of {} candidates handled, {} failed, {} bytes reclaimed",
            self.success_count(),
            self.records.len(),
            self.failure_count(),
            self.bytes_reclaimed
        )
    }
}

/// Apply `plan` to every candidate.
///
/// `shutdown` is checked before each candidate. The quarantine folder is
/// created on the first move; if that fails every move fails with
/// [`ActionError::QuarantineUnavailable`].
pub fn apply_actions(
    candidates: &[Candidate],
    plan: &ActionPlan,
    progress: Option<&dyn ProgressCallback>,
    shutdown: Option<&AtomicBool>,
) -> ActionReport {
    let mut report = ActionReport::default();
    let mut quarantine: Option<Result<PathBuf, ActionError>> = None;
    let total = candidates.len();

    if let Some(cb) = progress {
        cb.on_phase_start(PHASE_ACTION, total);
    }

    for (index, candidate) in candidates.iter().enumerate() {
        let path = &candidate.record.path;

        if !report.interrupted && shutdown.is_some_and(|f| f.load(Ordering::SeqCst)) {
            log::info!("Shutdown requested, skipping {} remaining candidates", total - index);
            report.interrupted = true;
        }

        let outcome = if report.interrupted {
            skipped(SKIP_INTERRUPTED)
        } else if plan.dry_run {
            if let Some(cb) = progress {
                cb.on_message(&format!("[DRY] would {} {}", plan.action, path.display()));
            }
            skipped(SKIP_DRY_RUN)
        } else {
            match act(candidate, plan, &mut quarantine) {
                Ok(outcome) => {
                    report.bytes_reclaimed += candidate.record.size;
                    if let Some(cb) = progress {
                        cb.on_message(&action_line(path, &outcome));
                        cb.on_item_completed(candidate.record.size);
                    }
                    outcome
                }
                Err(e) => {
                    log::warn!("{e}");
                    if let Some(cb) = progress {
                        cb.on_message(&format!("[ERR] {}: {}", path.display(), e));
                    }
                    let outcome = ActionOutcome::Failed {
                        reason: e.to_string(),
                    };
                    report.errors.push(e);
                    outcome
                }
            }
        };

        if let Some(cb) = progress {
            cb.on_progress(index + 1, &path.to_string_lossy());
        }
        report.records.push(ActionRecord {
            path: path.clone(),
            keeper: candidate.keeper.clone(),
            size: candidate.record.size,
            outcome,
        });
    }

    report.quarantine_dir = quarantine.and_then(Result::ok);

    if let Some(cb) = progress {
        if !plan.dry_run && !report.interrupted {
            let done = report.success_count();
            match (plan.action, &report.quarantine_dir) {
                (Action::Move, Some(dir)) => {
                    cb.on_message(&format!("Moved {done} duplicate files to: {}", dir.display()));
                }
                (Action::Delete, _) => cb.on_message(&format!("Deleted {done} duplicate files.")),
                _ => {}
            }
        }
        cb.on_phase_end(PHASE_ACTION);
    }
    log::info!("{}", report.summary());

    report
}

fn skipped(reason: &str) -> ActionOutcome {
    ActionOutcome::Skipped {
        reason: reason.to_string(),
    }
}

fn act(
    candidate: &Candidate,
    plan: &ActionPlan,
    quarantine: &mut Option<Result<PathBuf, ActionError>>,
) -> Result<ActionOutcome, ActionError> {
    let path = &candidate.record.path;
    FileSnapshot::from_record(&candidate.record).verify()?;

    match plan.action {
        Action::Move => {
            let dir = match quarantine
                .get_or_insert_with(|| ensure_quarantine_dir(&plan.quarantine_root))
            {
                Ok(dir) => dir.clone(),
                Err(e) => return Err(repeat_failure(e, path)),
            };
            let destination = move_to_quarantine(path, &dir)?;
            Ok(ActionOutcome::Moved { destination })
        }
        Action::Delete => {
            permanent_delete(path)?;
            Ok(ActionOutcome::Deleted)
        }
    }
}

/// Rebuild the cached quarantine failure for the next candidate.
fn repeat_failure(error: &ActionError, candidate: &Path) -> ActionError {
    match error {
        ActionError::QuarantineUnavailable { path, source } => ActionError::QuarantineUnavailable {
            path: path.clone(),
            source: io::Error::new(source.kind(), source.to_string()),
        },
        other => ActionError::MoveFailed {
            path: candidate.to_path_buf(),
            message: other.to_string(),
        },
    }
}

fn action_line(path: &Path, outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Moved { destination } => {
            format!("[MOVE] {} -> {}", path.display(), destination.display())
        }
        _ => format!("[DEL] {}", path.display()),
    }
}
