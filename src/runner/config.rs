//! Run configuration and root validation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::RunError;
use crate::actions::Action;
use crate::duplicates::Mode;
use crate::scanner::{Origin, WalkerConfig};

/// Everything a run needs, built by the caller.
///
/// # Example
///
/// ```
/// use dupremover::actions::Action;
/// use dupremover::duplicates::Mode;
/// use dupremover::runner::RunConfig;
///
/// let config = RunConfig::new("/photos")
///     .with_root_b("/backup")
///     .with_mode(Mode::AvsB)
///     .with_action(Action::Delete)
///     .with_delete_confirmed(true);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory A
    pub root_a: PathBuf,
    /// Directory B, required by the two-root modes
    pub root_b: Option<PathBuf>,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Comparison mode
    pub mode: Mode,
    /// What to do with candidates
    pub action: Action,
    /// Explicit consent for [`Action::Delete`]
    pub confirm_delete: bool,
    /// Resolve and report without touching any file
    pub dry_run: bool,
    /// Leave zero-byte files out of the scan
    pub skip_empty: bool,
    /// Leave dot-prefixed entries out of the scan
    pub skip_hidden: bool,
}

impl RunConfig {
    /// Recursive [`Mode::WithinA`] run moving duplicates of `root_a`.
    #[must_use]
    pub fn new(root_a: impl Into<PathBuf>) -> Self {
        Self {
            root_a: root_a.into(),
            root_b: None,
            recursive: true,
            mode: Mode::WithinA,
            action: Action::Move,
            confirm_delete: false,
            dry_run: false,
            skip_empty: false,
            skip_hidden: false,
        }
    }

    /// Set directory B.
    #[must_use]
    pub fn with_root_b(mut self, root_b: impl Into<PathBuf>) -> Self {
        self.root_b = Some(root_b.into());
        self
    }

    /// Set the comparison mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the action.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Set recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Confirm (or withdraw confirmation of) permanent deletion.
    #[must_use]
    pub fn with_delete_confirmed(mut self, confirmed: bool) -> Self {
        self.confirm_delete = confirmed;
        self
    }

    /// Enable or disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Skip zero-byte files.
    #[must_use]
    pub fn with_skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    /// Skip hidden entries.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Walker options derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default()
            .with_recursive(self.recursive)
            .with_skip_empty(self.skip_empty)
            .with_skip_hidden(self.skip_hidden)
    }

    /// Check the configuration against the filesystem without changing it.
    ///
    /// Returns the canonical roots to scan. `root_b` is ignored by
    /// [`Mode::WithinA`].
    ///
    /// # Errors
    ///
    /// - `PathNotFound` / `NotADirectory` for a bad root
    /// - `MissingRootB` if the mode compares two roots and B is absent
    /// - `SameRoots` if A and B resolve to the same directory
    /// - `OverlappingRoots` if a recursive scan of one root would cover the
    ///   other; a flat scan allows nested roots
    /// - `DeleteNotConfirmed` for an unconfirmed, non-dry-run delete
    pub fn validate(&self) -> Result<ValidatedRoots, RunError> {
        let a = canonical_dir(&self.root_a)?;

        let b = if self.mode.requires_root_b() {
            let raw = self.root_b.as_ref().ok_or(RunError::MissingRootB(self.mode))?;
            let b = canonical_dir(raw)?;
            if a == b {
                return Err(RunError::SameRoots(a));
            }
            if self.recursive && (a.starts_with(&b) || b.starts_with(&a)) {
                return Err(RunError::OverlappingRoots { a, b });
            }
            Some(b)
        } else {
            if let Some(ref b) = self.root_b {
                log::debug!("Ignoring directory B {} for mode {}", b.display(), self.mode);
            }
            None
        };

        if self.action == Action::Delete && !self.confirm_delete && !self.dry_run {
            return Err(RunError::DeleteNotConfirmed);
        }

        Ok(ValidatedRoots { a, b })
    }
}

fn canonical_dir(path: &Path) -> Result<PathBuf, RunError> {
    if path.as_os_str().is_empty() {
        return Err(RunError::InvalidInput("directory path is empty".to_string()));
    }
    let canonical = fs::canonicalize(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => RunError::PathNotFound(path.to_path_buf()),
        _ => RunError::InvalidInput(format!("cannot resolve {}: {}", path.display(), e)),
    })?;
    if !canonical.is_dir() {
        return Err(RunError::NotADirectory(path.to_path_buf()));
    }
    Ok(canonical)
}

/// Canonical roots that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRoots {
    /// Directory A
    pub a: PathBuf,
    /// Directory B, present only for the two-root modes
    pub b: Option<PathBuf>,
}

impl ValidatedRoots {
    /// Root tagged with `origin`.
    #[must_use]
    pub fn root(&self, origin: Origin) -> Option<&Path> {
        match origin {
            Origin::A => Some(&self.a),
            Origin::B => self.b.as_deref(),
        }
    }

    /// Root whose files `mode` removes, and which hosts the quarantine folder.
    #[must_use]
    pub fn removal_root(&self, mode: Mode) -> &Path {
        self.root(mode.removal_origin()).unwrap_or(&self.a)
    }
}
