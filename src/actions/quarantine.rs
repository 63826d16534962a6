//! Quarantine folder handling.
//!
//! Moved duplicates go to `<root>/_duplicates`, flat, keeping their file
//! name. A name that is already taken becomes `stem(1).ext`, `stem(2).ext`
//! and so on; an existing file is never overwritten.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::ActionError;
use crate::scanner::QUARANTINE_DIR_NAME;

/// Create `<root>/_duplicates` if needed and return its path.
///
/// # Errors
///
/// Returns [`ActionError::QuarantineUnavailable`] if the folder cannot be
/// created, or if something other than a directory already has its name.
pub fn ensure_quarantine_dir(root: &Path) -> Result<PathBuf, ActionError> {
    let dir = root.join(QUARANTINE_DIR_NAME);

    match fs::symlink_metadata(&dir) {
        Ok(meta) if meta.is_dir() => return Ok(dir),
        Ok(_) => {
            return Err(ActionError::QuarantineUnavailable {
                path: dir,
                source: io::Error::new(io::ErrorKind::AlreadyExists, "exists and is not a directory"),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(ActionError::QuarantineUnavailable { path: dir, source: e }),
    }

    fs::create_dir_all(&dir).map_err(|e| ActionError::QuarantineUnavailable {
        path: dir.clone(),
        source: e,
    })?;
    log::info!("Created quarantine folder {}", dir.display());
    Ok(dir)
}

/// First free destination for `file_name` inside `dir`.
///
/// Returns `dir/file_name` when free, otherwise `dir/stem(k).ext` with the
/// smallest `k >= 1` that does not exist yet.
#[must_use]
pub fn unique_destination(dir: &Path, file_name: &Path) -> PathBuf {
    let direct = dir.join(file_name);
    if !exists_no_follow(&direct) {
        return direct;
    }

    let stem = file_name
        .file_stem()
        .map_or_else(|| file_name.as_os_str().to_owned(), ToOwned::to_owned);
    let extension = file_name.extension();

    (1u64..)
        .map(|k| {
            let mut name = OsString::from(&stem);
            name.push(format!("({k})"));
            if let Some(ext) = extension {
                name.push(".");
                name.push(ext);
            }
            dir.join(name)
        })
        .find(|candidate| !exists_no_follow(candidate))
        .unwrap_or(direct)
}

fn exists_no_follow(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Move `path` into `quarantine_dir` under a collision-free name.
///
/// Returns the final destination.
///
/// # Errors
///
/// - `NotFound` if the source is gone
/// - `MoveFailed` if neither rename nor the copy fallback succeeds
pub fn move_to_quarantine(path: &Path, quarantine_dir: &Path) -> Result<PathBuf, ActionError> {
    let file_name = path.file_name().ok_or_else(|| ActionError::MoveFailed {
        path: path.to_path_buf(),
        message: "path has no file name".to_string(),
    })?;
    if !exists_no_follow(path) {
        return Err(ActionError::NotFound(path.to_path_buf()));
    }

    let destination = unique_destination(quarantine_dir, Path::new(file_name));
    relocate_file(path, &destination).map_err(|e| {
        log::error!("Move failed for {}: {}", path.display(), e);
        ActionError::MoveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::debug!("Moved {} -> {}", path.display(), destination.display());
    Ok(destination)
}

#[cfg(unix)]
const CROSS_DEVICE_OS_ERROR: i32 = 18; // EXDEV
#[cfg(windows)]
const CROSS_DEVICE_OS_ERROR: i32 = 17; // ERROR_NOT_SAME_DEVICE
#[cfg(not(any(unix, windows)))]
const CROSS_DEVICE_OS_ERROR: i32 = -1;

fn is_cross_device_error(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(CROSS_DEVICE_OS_ERROR)
}

/// Rename, falling back to copy + sync + remove across filesystems.
fn relocate_file(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(err) if is_cross_device_error(&err) => {
            log::debug!("Cross-device move, copying {}", src.display());
            copy_new(src, dest)?;
            fs::remove_file(src)
        }
        Err(err) => Err(err),
    }
}

/// Copy into a file that must not exist yet, then flush it to disk.
fn copy_new(src: &Path, dest: &Path) -> io::Result<()> {
    let mut reader = fs::File::open(src)?;
    let mut writer = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)?;

    let copied = io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all());
    if let Err(e) = copied {
        drop(writer);
        let _ = fs::remove_file(dest);
        return Err(e);
    }

    if let Ok(modified) = fs::metadata(src).and_then(|m| m.modified()) {
        let _ = writer.set_modified(modified);
    }
    Ok(())
}
