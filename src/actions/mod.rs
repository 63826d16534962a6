//! File actions module.
//!
//! This module provides functionality for:
//! - Moving duplicates into a quarantine folder without overwriting
//! - Permanent deletion (requires explicit confirmation upstream)
//! - Applying either action to a resolved candidate list
//!
//! # Safety
//!
//! Every candidate is checked against its scan snapshot (size and
//! modification time) right before it is touched. A file that changed is
//! left alone and reported. One failure never stops the remaining
//! candidates.
//!
//! ```no_run
//! use dupremover::actions::quarantine::{ensure_quarantine_dir, move_to_quarantine};
//! use std::path::Path;
//!
//! let dir = ensure_quarantine_dir(Path::new("/photos")).unwrap();
//! let moved_to = move_to_quarantine(Path::new("/photos/copy.jpg"), &dir).unwrap();
//! println!("moved to {}", moved_to.display());
//! ```

pub mod apply;
pub mod delete;
pub mod quarantine;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

// Re-export commonly used types
pub use apply::{apply_actions, ActionPlan, ActionRecord, ActionReport};
pub use delete::{permanent_delete, FileSnapshot};
pub use quarantine::{ensure_quarantine_dir, move_to_quarantine, unique_destination};

/// What to do with each removal candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Move into the quarantine folder of the removal root
    #[default]
    Move,
    /// Remove permanently
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move => write!(f, "move"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

/// Outcome for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActionOutcome {
    /// Moved into quarantine
    Moved {
        /// Final location inside the quarantine folder
        destination: PathBuf,
    },
    /// Permanently removed
    Deleted,
    /// Not touched
    Skipped {
        /// Why the candidate was left alone
        reason: String,
    },
    /// The action was attempted and failed
    Failed {
        /// Error message
        reason: String,
    },
}

impl ActionOutcome {
    /// Returns true if the file was moved or deleted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Deleted)
    }

    /// Short status label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Moved { .. } => "moved",
            Self::Deleted => "deleted",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    /// Destination or reason, empty for deletions.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Moved { destination } => destination.display().to_string(),
            Self::Deleted => String::new(),
            Self::Skipped { reason } | Self::Failed { reason } => reason.clone(),
        }
    }
}

/// Error type for move and delete operations.
#[derive(Debug, Error)]
pub enum ActionError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when touching the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File was modified since scan.
    #[error("file modified since scan: {0}")]
    Modified(PathBuf),

    /// Moving into quarantine failed.
    #[error("move failed for {path}: {message}")]
    MoveFailed { path: PathBuf, message: String },

    /// Permanent delete failed.
    #[error("delete failed for {path}: {message}")]
    DeleteFailed { path: PathBuf, message: String },

    /// The quarantine folder could not be created.
    #[error("cannot create quarantine folder {path}: {source}")]
    QuarantineUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Modified(p)
            | Self::MoveFailed { path: p, .. }
            | Self::DeleteFailed { path: p, .. }
            | Self::QuarantineUnavailable { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    /// Classify an I/O error for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
