//! Run result: what was found, what was done, what went wrong.

use std::path::PathBuf;

use bytesize::ByteSize;
use serde::Serialize;

use crate::actions::{Action, ActionError, ActionOutcome, ActionRecord};
use crate::duplicates::Mode;
use crate::scanner::ScanError;

/// Where a per-file error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Walking or hashing
    Scan,
    /// Moving or deleting
    Action,
}

/// A per-file error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    /// File or directory involved
    pub path: PathBuf,
    /// Error message
    pub reason: String,
    /// Phase that produced it
    pub kind: ErrorKind,
}

impl From<&ScanError> for ErrorEntry {
    fn from(e: &ScanError) -> Self {
        Self {
            path: e.path().to_path_buf(),
            reason: e.to_string(),
            kind: ErrorKind::Scan,
        }
    }
}

impl From<&ActionError> for ErrorEntry {
    fn from(e: &ActionError) -> Self {
        Self {
            path: e.path().to_path_buf(),
            reason: e.to_string(),
            kind: ErrorKind::Action,
        }
    }
}

/// One removal candidate and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    /// Duplicate file
    pub path: PathBuf,
    /// Copy that was kept
    pub keeper: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Requested action
    pub action: Action,
    /// Result of the action
    pub outcome: ActionOutcome,
}

impl CandidateReport {
    /// Build from an action record.
    #[must_use]
    pub fn from_record(record: ActionRecord, action: Action) -> Self {
        Self {
            path: record.path,
            keeper: record.keeper,
            size: record.size,
            action,
            outcome: record.outcome,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Comparison mode used
    pub mode: Mode,
    /// Action requested
    pub action: Action,
    /// Nothing was touched on purpose
    pub dry_run: bool,
    /// Files discovered across all scanned roots
    pub scanned_count: usize,
    /// Number of duplicate groups
    pub duplicate_group_count: usize,
    /// Every removal candidate, in traversal order
    pub candidates: Vec<CandidateReport>,
    /// Bytes freed by moved or deleted candidates
    pub bytes_reclaimed: u64,
    /// Scan errors followed by action errors
    pub errors: Vec<ErrorEntry>,
    /// Cancelled during the action phase
    pub interrupted: bool,
    /// Quarantine folder used, if any
    pub quarantine_dir: Option<PathBuf>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl RunResult {
    fn count(&self, label: &str) -> usize {
        self.candidates
            .iter()
            .filter(|c| c.outcome.label() == label)
            .count()
    }

    /// Candidates moved into quarantine.
    #[must_use]
    pub fn moved_count(&self) -> usize {
        self.count("moved")
    }

    /// Candidates permanently deleted.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.count("deleted")
    }

    /// Candidates left alone.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count("skipped")
    }

    /// Candidates whose action failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count("failed")
    }

    /// Returns true if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns true if any scan or action error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Size of all candidates, handled or not.
    #[must_use]
    pub fn candidate_bytes(&self) -> u64 {
        self.candidates.iter().map(|c| c.size).sum()
    }

    /// One-line human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let handled = match self.action {
            _ if self.dry_run => format!("{} would be {}d", self.candidates.len(), self.action),
            Action::Move => format!("{} moved", self.moved_count()),
            Action::Delete => format!("{} deleted", self.deleted_count()),
        };
        format!(
            "Scanned {} files: {} duplicate groups, {} candidates, {}, {} reclaimed, {} errors",
            self.scanned_count,
            self.duplicate_group_count,
            self.candidates.len(),
            handled,
            ByteSize::b(self.bytes_reclaimed),
            self.errors.len()
        )
    }
}
