//! Keeper and candidate selection for each comparison mode.
//!
//! # Modes
//!
//! - [`Mode::WithinA`]: duplicates inside one root. The first copy in
//!   traversal order is kept, every later copy is a candidate.
//! - [`Mode::AvsB`]: remove from B whatever already exists in A. Every
//!   matching copy in B is a candidate; A's first copy is the keeper and A's
//!   other copies are retained.
//! - [`Mode::BvsA`]: the mirror image, removing from A.
//!
//! Only sizes returned by [`relevant_sizes`] need a digest before
//! resolving; the result is the same as hashing everything.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::groups::{group_by_size, DuplicateGroup};
use super::index::FingerprintIndex;
use crate::scanner::{FileRecord, Origin};

/// Duplicate-detection scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Mode {
    /// Duplicates within directory A
    #[default]
    #[serde(rename = "within")]
    WithinA,
    /// Remove from B the files that also exist in A
    #[serde(rename = "a-vs-b")]
    AvsB,
    /// Remove from A the files that also exist in B
    #[serde(rename = "b-vs-a")]
    BvsA,
}

impl Mode {
    /// Returns true if the mode compares two roots.
    #[must_use]
    pub fn requires_root_b(self) -> bool {
        !matches!(self, Mode::WithinA)
    }

    /// Root whose keeper copies survive.
    #[must_use]
    pub fn kept_origin(self) -> Origin {
        match self {
            Mode::WithinA | Mode::AvsB => Origin::A,
            Mode::BvsA => Origin::B,
        }
    }

    /// Root that candidates are removed from. Also hosts the quarantine folder.
    #[must_use]
    pub fn removal_origin(self) -> Origin {
        match self {
            Mode::WithinA | Mode::BvsA => Origin::A,
            Mode::AvsB => Origin::B,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Mode::WithinA => "duplicates within A",
            Mode::AvsB => "A vs B (remove from B)",
            Mode::BvsA => "B vs A (remove from A)",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::WithinA => write!(f, "within"),
            Mode::AvsB => write!(f, "a-vs-b"),
            Mode::BvsA => write!(f, "b-vs-a"),
        }
    }
}

/// A file selected for removal together with the copy that survives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The duplicate to remove
    pub record: FileRecord,
    /// Path of the group's keeper
    pub keeper: PathBuf,
}

/// Resolved duplicate groups for one run.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Groups ordered by their keeper's traversal position
    pub groups: Vec<DuplicateGroup>,
}

impl Resolution {
    /// Every candidate across all groups, in traversal order.
    #[must_use]
    pub fn candidates(&self) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .groups
            .iter()
            .flat_map(|g| {
                g.candidates.iter().map(|record| Candidate {
                    record: record.clone(),
                    keeper: g.keeper.path.clone(),
                })
            })
            .collect();
        candidates.sort_by_key(|c| c.record.seq);
        candidates
    }

    /// Number of duplicate groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of removal candidates.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::candidate_count).sum()
    }

    /// Bytes freed if every candidate is removed.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::reclaimable_space).sum()
    }

    /// Returns true if there is nothing to remove.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Sizes that need a digest before resolving.
///
/// `WithinA` needs sizes shared by at least two files in A. The two-root
/// modes need sizes present on both sides; `b` is ignored for `WithinA`.
#[must_use]
pub fn relevant_sizes(mode: Mode, a: &[FileRecord], b: &[FileRecord]) -> HashSet<u64> {
    match mode {
        Mode::WithinA => {
            let (groups, stats) = group_by_size(a);
            log::debug!(
                "Size grouping: {} of {} files share a size ({:.1}% eliminated)",
                stats.potential_duplicates,
                stats.total_files,
                stats.elimination_rate()
            );
            groups.into_keys().collect()
        }
        Mode::AvsB | Mode::BvsA => {
            let a_sizes: HashSet<u64> = a.iter().map(|r| r.size).collect();
            b.iter()
                .map(|r| r.size)
                .filter(|size| a_sizes.contains(size))
                .collect()
        }
    }
}

/// Resolve duplicate groups for `mode`.
///
/// `a` and `b` are the fingerprint indexes of each root. `b` is ignored for
/// `WithinA`; for the two-root modes a missing `b` yields no groups.
#[must_use]
pub fn resolve(mode: Mode, a: &FingerprintIndex, b: Option<&FingerprintIndex>) -> Resolution {
    let mut groups = match (mode, b) {
        (Mode::WithinA, _) => resolve_within(a),
        (Mode::AvsB | Mode::BvsA, Some(b)) => {
            let (keep, remove) = match mode.kept_origin() {
                Origin::A => (a, b),
                Origin::B => (b, a),
            };
            resolve_between(keep, remove)
        }
        (_, None) => {
            log::warn!("Mode {mode} needs a second index; nothing to resolve");
            Vec::new()
        }
    };

    groups.sort_by_key(|g| g.keeper.seq);
    Resolution { groups }
}

fn resolve_within(index: &FingerprintIndex) -> Vec<DuplicateGroup> {
    index
        .iter()
        .filter(|(_, records)| records.len() >= 2)
        .map(|(fp, records)| {
            DuplicateGroup::new(*fp, records[0].clone(), Vec::new(), records[1..].to_vec())
        })
        .collect()
}

fn resolve_between(keep: &FingerprintIndex, remove: &FingerprintIndex) -> Vec<DuplicateGroup> {
    keep.iter()
        .filter_map(|(fp, kept)| {
            let removable = remove.get(fp)?;
            let (keeper, retained) = kept.split_first()?;
            Some(DuplicateGroup::new(
                *fp,
                keeper.clone(),
                retained.to_vec(),
                removable.to_vec(),
            ))
        })
        .collect()
}
