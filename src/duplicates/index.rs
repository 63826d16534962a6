//! Per-root file index and fingerprint lookup.
//!
//! A [`RootIndex`] holds everything the walk found under one root, in
//! traversal order, together with the errors hit along the way. Digests are
//! filled afterwards by [`RootIndex::hash_sizes`] for the sizes that can
//! actually produce a duplicate; a [`FingerprintIndex`] is then built from
//! the hashed records.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::progress::{ProgressCallback, PHASE_HASH, PHASE_WALK};
use crate::scanner::{FileRecord, Fingerprint, HashError, Hasher, Origin, ScanError, Walker};

/// Report a progress line roughly every this many files.
const PROGRESS_LOG_INTERVAL: usize = 50;

/// Outcome of a hashing pass over one root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashStats {
    /// Files whose digest was computed
    pub hashed_files: usize,
    /// Files dropped because they could not be read
    pub failed_files: usize,
    /// Bytes fed into the hasher
    pub bytes_hashed: u64,
    /// Hashing stopped early because shutdown was requested
    pub interrupted: bool,
}

/// Files discovered under one root, in traversal order.
#[derive(Debug)]
pub struct RootIndex {
    root: PathBuf,
    origin: Origin,
    records: Vec<FileRecord>,
    errors: Vec<ScanError>,
}

impl RootIndex {
    /// Build an empty index for `root`.
    #[must_use]
    pub fn new(root: &Path, origin: Origin) -> Self {
        Self {
            root: root.to_path_buf(),
            origin,
            records: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Run `walker` to completion and collect its records and errors.
    pub fn from_walker(
        walker: &Walker,
        origin: Origin,
        progress: Option<&dyn ProgressCallback>,
    ) -> Self {
        let mut index = Self::new(walker.root(), origin);

        if let Some(cb) = progress {
            cb.on_phase_start(PHASE_WALK, 0);
            cb.on_message(&format!("Indexing files in: {}", walker.root().display()));
        }

        for entry in walker.walk() {
            match entry {
                Ok(record) => {
                    if let Some(cb) = progress {
                        cb.on_progress(index.records.len() + 1, &record.path.to_string_lossy());
                    }
                    index.records.push(record);
                }
                Err(e) => {
                    log::warn!("{e}");
                    if let Some(cb) = progress {
                        cb.on_message(&format!("[ERR] {}: {}", e.path().display(), e));
                    }
                    index.errors.push(e);
                }
            }
        }

        if let Some(cb) = progress {
            cb.on_message(&format!(
                "Found {} files in: {}",
                index.records.len(),
                walker.root().display()
            ));
            cb.on_phase_end(PHASE_WALK);
        }
        log::info!(
            "Walked {} ({}): {} files, {} errors",
            index.root.display(),
            index.origin,
            index.records.len(),
            index.errors.len()
        );

        index
    }

    /// Records in traversal order. Records that failed to hash are gone.
    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Take ownership of the collected errors.
    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the walk found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compute digests for every record whose size is in `sizes`.
    ///
    /// A record that cannot be read is removed from the index and its error
    /// is kept, so it never takes part in grouping. When the hasher reports
    /// that shutdown was requested the pass stops and
    /// [`HashStats::interrupted`] is set; records not reached keep no digest.
    pub fn hash_sizes(
        &mut self,
        sizes: &HashSet<u64>,
        hasher: &Hasher,
        progress: Option<&dyn ProgressCallback>,
    ) -> HashStats {
        let mut stats = HashStats::default();
        let pending = self
            .records
            .iter()
            .filter(|r| r.digest.is_none() && sizes.contains(&r.size))
            .count();

        if let Some(cb) = progress {
            cb.on_phase_start(PHASE_HASH, pending);
        }

        let records = std::mem::take(&mut self.records);
        let mut kept = Vec::with_capacity(records.len());
        let mut done = 0usize;

        for mut record in records {
            if stats.interrupted || record.digest.is_some() || !sizes.contains(&record.size) {
                kept.push(record);
                continue;
            }

            let shown = record.path.to_string_lossy().into_owned();
            match hasher.hash_file(&record.path) {
                Ok(digest) => {
                    record.digest = Some(digest);
                    stats.hashed_files += 1;
                    stats.bytes_hashed += record.size;
                    kept.push(record);
                }
                Err(HashError::Interrupted(_)) => {
                    stats.interrupted = true;
                    kept.push(record);
                    continue;
                }
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", record.path.display(), e);
                    if let Some(cb) = progress {
                        cb.on_message(&format!("[ERR] {}: {}", record.path.display(), e));
                    }
                    stats.failed_files += 1;
                    self.errors.push(ScanError::Hash(e));
                }
            }

            done += 1;
            if let Some(cb) = progress {
                cb.on_progress(done, &shown);
                if done % PROGRESS_LOG_INTERVAL == 0 {
                    cb.on_message(&format!("Hashed {done}/{pending} files in {}", self.root.display()));
                }
            }
        }

        self.records = kept;

        if let Some(cb) = progress {
            cb.on_phase_end(PHASE_HASH);
        }
        log::debug!(
            "Hashed {} files ({} bytes) under {}, {} failed",
            stats.hashed_files,
            stats.bytes_hashed,
            self.root.display(),
            stats.failed_files
        );

        stats
    }

    /// Index the hashed records by fingerprint.
    #[must_use]
    pub fn fingerprints(&self) -> FingerprintIndex {
        FingerprintIndex::from_records(&self.records)
    }
}

/// Records grouped by fingerprint, each list in traversal order.
///
/// Records without a digest are not indexed.
#[derive(Debug, Clone, Default)]
pub struct FingerprintIndex {
    entries: HashMap<Fingerprint, Vec<FileRecord>>,
}

impl FingerprintIndex {
    /// Index every hashed record in `records`, preserving their order.
    #[must_use]
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut entries: HashMap<Fingerprint, Vec<FileRecord>> = HashMap::new();
        for record in records {
            if let Some(fp) = record.fingerprint() {
                entries.entry(fp).or_default().push(record.clone());
            }
        }
        Self { entries }
    }

    /// Records sharing `fingerprint`.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&[FileRecord]> {
        self.entries.get(fingerprint).map(Vec::as_slice)
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over fingerprints and their records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &[FileRecord])> {
        self.entries.iter().map(|(fp, records)| (fp, records.as_slice()))
    }
}
