//! JSON output formatter for run results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "run": {
//!     "mode": "a-vs-b",
//!     "action": "move",
//!     "dry_run": false,
//!     "scanned_count": 120,
//!     "duplicate_groups": 3,
//!     "candidate_count": 4,
//!     "moved": 4,
//!     "deleted": 0,
//!     "skipped": 0,
//!     "failed": 0,
//!     "bytes_reclaimed": 51200,
//!     "interrupted": false,
//!     "quarantine_dir": "/backup/_duplicates",
//!     "duration_ms": 87
//!   },
//!   "candidates": [
//!     {
//!       "path": "/backup/photo.jpg",
//!       "keeper": "/photos/photo.jpg",
//!       "size": 12800,
//!       "action": "move",
//!       "outcome": { "status": "moved", "destination": "/backup/_duplicates/photo.jpg" }
//!     }
//!   ],
//!   "errors": [],
//!   "exit_code": 0,
//!   "exit_code_name": "DR000"
//! }
//! ```

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::actions::Action;
use crate::duplicates::Mode;
use crate::error::ExitCode;
use crate::runner::{CandidateReport, ErrorEntry, RunResult};

/// Run totals in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRunSummary {
    /// Comparison mode
    pub mode: Mode,
    /// Requested action
    pub action: Action,
    /// Whether nothing was touched on purpose
    pub dry_run: bool,
    /// Files discovered across all scanned roots
    pub scanned_count: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Number of removal candidates
    pub candidate_count: usize,
    /// Candidates moved into quarantine
    pub moved: usize,
    /// Candidates deleted
    pub deleted: usize,
    /// Candidates left alone
    pub skipped: usize,
    /// Candidates whose action failed
    pub failed: usize,
    /// Bytes freed
    pub bytes_reclaimed: u64,
    /// Whether the action phase was interrupted
    pub interrupted: bool,
    /// Quarantine folder, if one was used
    pub quarantine_dir: Option<PathBuf>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl JsonRunSummary {
    /// Summarize a run result.
    #[must_use]
    pub fn from_result(result: &RunResult) -> Self {
        Self {
            mode: result.mode,
            action: result.action,
            dry_run: result.dry_run,
            scanned_count: result.scanned_count,
            duplicate_groups: result.duplicate_group_count,
            candidate_count: result.candidates.len(),
            moved: result.moved_count(),
            deleted: result.deleted_count(),
            skipped: result.skipped_count(),
            failed: result.failed_count(),
            bytes_reclaimed: result.bytes_reclaimed,
            interrupted: result.interrupted,
            quarantine_dir: result.quarantine_dir.clone(),
            duration_ms: result.duration_ms,
        }
    }
}

/// Complete JSON document for one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    /// Run totals
    pub run: JsonRunSummary,
    /// Every candidate with its outcome
    pub candidates: &'a [CandidateReport],
    /// Per-file errors
    pub errors: &'a [ErrorEntry],
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DR000")
    pub exit_code_name: &'static str,
}

/// JSON output formatter.
#[derive(Debug, Clone)]
pub struct JsonOutput<'a> {
    report: RunReport<'a>,
}

impl<'a> JsonOutput<'a> {
    /// Create a JSON output from a run result and its exit code.
    #[must_use]
    pub fn new(result: &'a RunResult, exit_code: ExitCode) -> Self {
        Self {
            report: RunReport {
                run: JsonRunSummary::from_result(result),
                candidates: &result.candidates,
                errors: &result.errors,
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix(),
            },
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.report)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.report)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
