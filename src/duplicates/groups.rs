//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! Size grouping is the cheap first pass of duplicate detection: files with
//! different sizes cannot be duplicates, so only sizes shared by two or more
//! files ever get hashed.
//!
//! [`DuplicateGroup`] is the confirmed result: every record in it shares one
//! [`Fingerprint`].
//!
//! # Example
//!
//! ```
//! use dupremover::duplicates::group_by_size;
//! use dupremover::scanner::{FileRecord, Origin};
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024, SystemTime::UNIX_EPOCH, Origin::A, 0),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024, SystemTime::UNIX_EPOCH, Origin::A, 1),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048, SystemTime::UNIX_EPOCH, Origin::A, 2),
//! ];
//!
//! let (groups, stats) = group_by_size(&files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::HashMap;

use crate::scanner::{FileRecord, Fingerprint};

/// A confirmed set of files sharing one fingerprint.
///
/// `keeper` is the record that survives. `retained` holds other copies on
/// the kept side that are left alone (only populated when two roots are
/// compared). `candidates` are the copies selected for removal, in
/// traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Fingerprint shared by every record in the group
    pub fingerprint: Fingerprint,
    /// The copy that is preserved
    pub keeper: FileRecord,
    /// Further copies that are preserved without being the keeper
    pub retained: Vec<FileRecord>,
    /// Copies selected for removal
    pub candidates: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if any record's fingerprint differs from
    /// `fingerprint`.
    #[must_use]
    pub fn new(
        fingerprint: Fingerprint,
        keeper: FileRecord,
        retained: Vec<FileRecord>,
        candidates: Vec<FileRecord>,
    ) -> Self {
        let group = Self {
            fingerprint,
            keeper,
            retained,
            candidates,
        };
        debug_assert!(
            group
                .files()
                .all(|f| f.fingerprint() == Some(group.fingerprint)),
            "Every record in a duplicate group must share its fingerprint"
        );
        group
    }

    /// File size shared by all records.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.fingerprint.size
    }

    /// All records: keeper first, then retained copies, then candidates.
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        std::iter::once(&self.keeper)
            .chain(self.retained.iter())
            .chain(self.candidates.iter())
    }

    /// Total number of records in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.retained.len() + self.candidates.len()
    }

    /// A group always holds its keeper, so it is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of removal candidates.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Bytes freed if every candidate is removed.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.size() * self.candidates.len() as u64
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        self.fingerprint.digest_hex()
    }
}

/// Statistics from the size grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Number of files sharing their size with at least one other file
    pub potential_duplicates: usize,
    /// Number of files eliminated because their size is unique
    pub eliminated_unique: usize,
    /// Number of zero-byte files seen
    pub empty_files: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group records by size, keeping only sizes shared by two or more files.
///
/// Records inside each group stay in the order they were given. Zero-byte
/// files are grouped like any other size.
#[must_use]
pub fn group_by_size<'a>(
    files: impl IntoIterator<Item = &'a FileRecord>,
) -> (HashMap<u64, Vec<&'a FileRecord>>, GroupingStats) {
    let mut all_groups: HashMap<u64, Vec<&'a FileRecord>> = HashMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }
        all_groups.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = all_groups.len();

    let filtered: HashMap<u64, Vec<&'a FileRecord>> = all_groups
        .into_iter()
        .filter(|(size, files)| {
            if files.len() == 1 {
                stats.eliminated_unique += 1;
                log::trace!(
                    "Eliminated unique size {}: {}",
                    size,
                    files[0].path.display()
                );
                false
            } else {
                stats.potential_duplicates += files.len();
                true
            }
        })
        .collect();

    (filtered, stats)
}
