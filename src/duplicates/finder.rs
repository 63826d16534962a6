//! Duplicate finder: walks one or two roots, hashes what can collide, and
//! resolves duplicate groups for a comparison mode.
//!
//! # Overview
//!
//! 1. **Walk** every root into a [`RootIndex`] (sorted, depth first)
//! 2. **Size filter**: pick the sizes that can produce a duplicate for the mode
//! 3. **Hash** only records of those sizes (SHA-256, 1 MiB chunks)
//! 4. **Resolve** keepers and candidates per fingerprint
//!
//! # Example
//!
//! ```no_run
//! use dupremover::duplicates::{DuplicateFinder, FinderConfig, Mode};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (resolution, summary) = finder
//!     .find(Mode::AvsB, Path::new("/photos"), Some(Path::new("/backup")))
//!     .unwrap();
//!
//! println!("{} groups, {} reclaimable", resolution.group_count(), summary.reclaimable_display());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::index::{FingerprintIndex, RootIndex};
use super::resolver::{relevant_sizes, resolve, Mode, Resolution};
use crate::progress::ProgressCallback;
use crate::scanner::{Hasher, Origin, ScanError, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files discovered across all roots
    pub total_files: usize,
    /// Total size of all discovered files in bytes
    pub total_size: u64,
    /// Files never hashed because their size cannot collide
    pub eliminated_by_size: usize,
    /// Files whose digest was computed
    pub files_hashed: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Number of removal candidates
    pub duplicate_files: usize,
    /// Space freed if every candidate is removed
    pub reclaimable_space: u64,
    /// Duration of the scan
    pub scan_duration: Duration,
    /// Errors encountered while walking or hashing
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that stop a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The mode compares two roots but only one was given.
    #[error("Mode '{0}' requires a second directory")]
    MissingRootB(Mode),
}

/// Duplicate finder for one run.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find duplicates for `mode`.
    ///
    /// `root_b` is required by the two-root modes and ignored by
    /// [`Mode::WithinA`]. Unreadable files are reported in
    /// [`ScanSummary::scan_errors`] and left out of every group.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - A root does not exist or is not a directory
    /// - The mode needs `root_b` and none was given
    /// - The scan is interrupted by shutdown signal
    pub fn find(
        &self,
        mode: Mode,
        root_a: &Path,
        root_b: Option<&Path>,
    ) -> Result<(Resolution, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        let root_b = if mode.requires_root_b() {
            Some(root_b.ok_or(FinderError::MissingRootB(mode))?)
        } else {
            None
        };
        validate_root(root_a)?;
        if let Some(b) = root_b {
            validate_root(b)?;
        }

        log::info!("Starting {} scan of {}", mode.description(), root_a.display());
        self.check_shutdown()?;

        let mut index_a = self.walk(root_a, Origin::A);
        let mut index_b = root_b.map(|b| self.walk(b, Origin::B));
        self.check_shutdown()?;
        if index_a.is_empty() {
            log::info!("No files found under {}", root_a.display());
        }

        let b_records = index_b.as_ref().map_or(&[][..], RootIndex::records);
        let sizes = relevant_sizes(mode, index_a.records(), b_records);

        summary.total_files = index_a.len() + index_b.as_ref().map_or(0, RootIndex::len);
        summary.total_size = index_a
            .records()
            .iter()
            .chain(b_records)
            .map(|r| r.size)
            .sum();
        summary.eliminated_by_size = index_a
            .records()
            .iter()
            .chain(b_records)
            .filter(|r| !sizes.contains(&r.size))
            .count();

        log::info!(
            "Found {} files ({}), {} sizes can collide",
            summary.total_files,
            summary.total_size_display(),
            sizes.len()
        );

        let progress = self.config.progress_callback.as_deref();
        for index in std::iter::once(&mut index_a).chain(index_b.as_mut()) {
            let stats = index.hash_sizes(&sizes, &self.hasher, progress);
            summary.files_hashed += stats.hashed_files;
            summary.bytes_hashed += stats.bytes_hashed;
            if stats.interrupted {
                return Err(FinderError::Interrupted);
            }
        }
        self.check_shutdown()?;

        summary.scan_errors.extend(index_a.take_errors());
        if let Some(ref mut b) = index_b {
            summary.scan_errors.extend(b.take_errors());
        }

        let fps_a = index_a.fingerprints();
        let fps_b = index_b.as_ref().map(RootIndex::fingerprints);
        log::debug!(
            "Distinct fingerprints: {} in A, {} in B",
            fps_a.len(),
            fps_b.as_ref().map_or(0, FingerprintIndex::len)
        );
        let resolution = resolve(mode, &fps_a, fps_b.as_ref());
        for group in &resolution.groups {
            log::debug!(
                "Group {} ({} bytes): {} files, {} to remove",
                group.hash_hex(),
                group.size(),
                group.len(),
                group.candidate_count()
            );
        }

        if let Some(cb) = progress {
            for candidate in resolution.candidates() {
                cb.on_message(&format!(
                    "[DUP] {} -> same as {}",
                    candidate.record.path.display(),
                    candidate.keeper.display()
                ));
            }
        }

        summary.duplicate_groups = resolution.group_count();
        summary.duplicate_files = resolution.candidate_count();
        summary.reclaimable_space = resolution.reclaimable_space();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} candidates, {} reclaimable, {} errors",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display(),
            summary.scan_errors.len()
        );

        Ok((resolution, summary))
    }

    fn walk(&self, root: &Path, origin: Origin) -> RootIndex {
        let mut walker = Walker::new(root, origin, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        RootIndex::from_walker(&walker, origin, self.config.progress_callback.as_deref())
    }

    fn check_shutdown(&self) -> Result<(), FinderError> {
        if self.config.is_shutdown_requested() {
            log::debug!("Shutdown requested, abandoning scan");
            return Err(FinderError::Interrupted);
        }
        Ok(())
    }
}

fn validate_root(path: &Path) -> Result<(), FinderError> {
    if !path.exists() {
        return Err(FinderError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(FinderError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}
