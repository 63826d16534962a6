//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sorted, depth-first directory walking using walkdir
//! - SHA-256 content hashing in fixed-size chunks
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: SHA-256 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupremover::scanner::{Origin, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), Origin::A, WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

// Re-export main types
pub use hasher::{hash_to_hex, Digest, Hasher, HASH_CHUNK_SIZE};
pub use walker::Walker;

/// Name of the quarantine folder created at the top of a scanned root.
///
/// Moved duplicates land here, and the walker never descends into it.
pub const QUARANTINE_DIR_NAME: &str = "_duplicates";

/// Which root a file was discovered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Origin {
    /// Directory A (the only root in single-directory mode)
    A,
    /// Directory B
    B,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::A => write!(f, "A"),
            Origin::B => write!(f, "B"),
        }
    }
}

/// Duplicate-equality key: file size plus content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint {
    /// File size in bytes
    pub size: u64,
    /// SHA-256 digest of the full content
    pub digest: Digest,
}

impl Fingerprint {
    /// Create a fingerprint from its parts.
    #[must_use]
    pub fn new(size: u64, digest: Digest) -> Self {
        Self { size, digest }
    }

    /// Digest as lowercase hexadecimal.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hash_to_hex(&self.digest)
    }
}

/// A file discovered during the walk.
///
/// The digest starts out empty and is filled at most once, in the hashing
/// phase, for files whose size collides with another relevant file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time, used to detect changes before acting
    pub modified: SystemTime,
    /// Root the file was found under
    pub origin: Origin,
    /// Position in traversal order within its root (0-based)
    pub seq: usize,
    /// Content digest, once computed
    pub digest: Option<Digest>,
}

impl FileRecord {
    /// Create a new record without a digest.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `modified` - Last modification time
    /// * `origin` - Root the file belongs to
    /// * `seq` - Traversal position within that root
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime, origin: Origin, seq: usize) -> Self {
        Self {
            path,
            size,
            modified,
            origin,
            seq,
            digest: None,
        }
    }

    /// Return this record with its digest set.
    #[must_use]
    pub fn with_digest(mut self, digest: Digest) -> Self {
        self.digest = Some(digest);
        self
    }

    /// The record's fingerprint, if the digest has been computed.
    #[must_use]
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.digest.map(|digest| Fingerprint::new(self.size, digest))
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Descend into subdirectories. When false only direct children are seen.
    pub recursive: bool,

    /// Skip zero-byte files. Off by default: empty files are duplicates of
    /// each other like any other identical content.
    pub skip_empty: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            skip_empty: false,
            skip_hidden: false,
        }
    }
}

impl WalkerConfig {
    /// Set whether to recurse into subdirectories.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether to skip zero-byte files.
    #[must_use]
    pub fn with_skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    /// Set whether to skip dot-prefixed entries.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path disappeared while the scan was running.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Io { path: p, .. } => p,
            Self::Hash(e) => e.path(),
        }
    }

    /// Classify an I/O error for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Interrupted(p)
            | Self::Io { path: p, .. } => p,
        }
    }
}
