//! Permanent deletion with snapshot verification.
//!
//! # Example
//!
//! ```no_run
//! use dupremover::actions::delete::{permanent_delete, FileSnapshot};
//! use std::path::Path;
//!
//! let path = Path::new("/path/to/duplicate.txt");
//! let snapshot = FileSnapshot::capture(path).unwrap();
//! // ... later, right before acting
//! snapshot.verify().unwrap();
//! let freed = permanent_delete(path).unwrap();
//! println!("freed {freed} bytes");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::ActionError;
use crate::scanner::FileRecord;

/// File metadata snapshot used to detect changes between scan and action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    /// Path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub mtime: Option<SystemTime>,
}

impl FileSnapshot {
    /// Snapshot as recorded during the scan.
    #[must_use]
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            path: record.path.clone(),
            size: record.size,
            mtime: Some(record.modified),
        }
    }

    /// Create a snapshot of a file's current state.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or can't be accessed.
    pub fn capture(path: &Path) -> Result<Self, ActionError> {
        let metadata = fs::symlink_metadata(path).map_err(|e| ActionError::from_io(path, e))?;
        if !metadata.is_file() {
            return Err(ActionError::Modified(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime: metadata.modified().ok(),
        })
    }

    /// Verify that the file still matches this snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if file was modified, deleted, or can't be accessed.
    pub fn verify(&self) -> Result<(), ActionError> {
        let current = Self::capture(&self.path)?;

        if let (Some(orig), Some(curr)) = (self.mtime, current.mtime) {
            if orig != curr {
                log::warn!(
                    "File modified since scan: {} (mtime changed)",
                    self.path.display()
                );
                return Err(ActionError::Modified(self.path.clone()));
            }
        }

        if self.size != current.size {
            log::warn!(
                "File modified since scan: {} (size changed from {} to {})",
                self.path.display(),
                self.size,
                current.size
            );
            return Err(ActionError::Modified(self.path.clone()));
        }

        Ok(())
    }
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// Returns the number of bytes freed.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `DeleteFailed` if the delete operation fails
pub fn permanent_delete(path: &Path) -> Result<u64, ActionError> {
    let size = fs::symlink_metadata(path)
        .map_err(|e| ActionError::from_io(path, e))?
        .len();

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        ActionError::DeleteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::debug!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(size)
}
