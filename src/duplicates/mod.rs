//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Per-root indexes with lazy hashing ([`index`])
//! - Size-based file grouping ([`groups`])
//! - Keeper and candidate selection per comparison mode ([`resolver`])
//! - The scan pipeline tying them together ([`finder`])

pub mod finder;
pub mod groups;
pub mod index;
pub mod resolver;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{group_by_size, DuplicateGroup, GroupingStats};
pub use index::{FingerprintIndex, HashStats, RootIndex};
pub use resolver::{relevant_sizes, resolve, Candidate, Mode, Resolution};
