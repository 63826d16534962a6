//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a root directory
//! and collecting [`FileRecord`]s for duplicate detection.
//!
//! Traversal is single-threaded and depth first, with each directory's
//! entries sorted by file name. The resulting order is reproducible for the
//! same filesystem state and decides which copy of a duplicate is kept.
//!
//! # Skipped entries
//!
//! - Symbolic links (never followed)
//! - Special files (sockets, FIFOs, devices)
//! - The root's quarantine folder ([`QUARANTINE_DIR_NAME`])
//! - Optionally: hidden entries and zero-byte files
//!
//! # Example
//!
//! ```no_run
//! use dupremover::scanner::{Origin, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::default().with_recursive(false);
//! let walker = Walker::new(Path::new("/home/user/Downloads"), Origin::A, config);
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, Origin, ScanError, WalkerConfig, QUARANTINE_DIR_NAME};

/// Directory walker for file discovery under one root.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Origin tag given to every record
    origin: Origin,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for cooperative cancellation
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given root.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `origin` - Which side of the comparison this root is
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, origin: Origin, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            origin,
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag. Iteration ends at the next entry once it is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root being walked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the directory tree, yielding file records in traversal order.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Records are numbered consecutively from 0 via
    /// [`FileRecord::seq`].
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let skip_hidden = self.config.skip_hidden;
        let mut seq = 0usize;

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| keep_entry(entry, skip_hidden))
            .take_while(move |_| {
                let stop = self.is_shutdown_requested();
                if stop {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                }
                !stop
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let record = self.process_entry(&entry, seq)?;
                    if record.is_ok() {
                        seq += 1;
                    }
                    Some(record)
                }
                Err(e) => Some(Err(self.handle_walkdir_error(e))),
            })
    }

    /// Turn a directory entry into a record, or `None` if it is skipped.
    fn process_entry(&self, entry: &DirEntry, seq: usize) -> Option<Result<FileRecord, ScanError>> {
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", path.display());
            return None;
        }
        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", path.display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walkdir_error(e))),
        };

        let size = metadata.len();
        if size == 0 && self.config.skip_empty {
            log::debug!("Skipping empty file: {}", path.display());
            return None;
        }

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Some(Ok(FileRecord::new(
            path.to_path_buf(),
            size,
            modified,
            self.origin,
            seq,
        )))
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walkdir_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let err = match error.into_io_error() {
            Some(io) => ScanError::from_io(&path, io),
            None => ScanError::Io {
                path,
                source: std::io::Error::other("filesystem loop detected"),
            },
        };
        log::warn!("Walker error: {}", err);
        err
    }
}

/// Directory filter applied before descending.
fn keep_entry(entry: &DirEntry, skip_hidden: bool) -> bool {
    if entry.depth() == 1
        && entry.file_type().is_dir()
        && entry.file_name() == OsStr::new(QUARANTINE_DIR_NAME)
    {
        log::trace!("Skipping quarantine folder: {}", entry.path().display());
        return false;
    }
    if skip_hidden && entry.file_name().to_string_lossy().starts_with('.') {
        log::trace!("Skipping hidden entry: {}", entry.path().display());
        return false;
    }
    true
}
