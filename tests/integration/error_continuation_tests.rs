use dupremover::actions::ActionOutcome;
use dupremover::progress::{ProgressCallback, PHASE_ACTION, PHASE_HASH};
use dupremover::runner::{ErrorKind, RunConfig, Runner};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Runs a closure when a given phase starts.
struct PhaseHook<F: Fn() + Send + Sync> {
    phase: &'static str,
    hook: F,
}

impl<F: Fn() + Send + Sync> ProgressCallback for PhaseHook<F> {
    fn on_phase_start(&self, phase: &str, _total: usize) {
        if phase == self.phase {
            (self.hook)();
        }
    }
    fn on_progress(&self, _current: usize, _path: &str) {}
    fn on_phase_end(&self, _phase: &str) {}
}

#[test]
fn test_file_vanishing_before_hashing_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "dup").unwrap();
    fs::write(dir.path().join("b.txt"), "dup").unwrap();
    fs::write(dir.path().join("c.txt"), "dup").unwrap();
    let victim = dir.path().join("b.txt");

    let hook = PhaseHook {
        phase: PHASE_HASH,
        hook: move || {
            let _ = fs::remove_file(&victim);
        },
    };
    let result = Runner::new(RunConfig::new(dir.path()).with_dry_run(true))
        .with_progress_callback(Arc::new(hook))
        .run()
        .unwrap();

    // b.txt is gone from every group, its siblings still pair up
    assert_eq!(result.duplicate_group_count, 1);
    assert_eq!(result.candidates.len(), 1);
    assert!(result.candidates[0].path.ends_with("c.txt"));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::Scan);
    assert!(result.errors[0].path.ends_with("b.txt"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_excluded_and_reported() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "dup").unwrap();
    fs::write(dir.path().join("b.txt"), "dup").unwrap();
    fs::write(dir.path().join("c.txt"), "dup").unwrap();
    let locked = dir.path().join("b.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read(&locked).is_ok() {
        // Running with privileges that ignore file modes
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let result = Runner::new(RunConfig::new(dir.path()).with_dry_run(true))
        .run()
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    let candidates: Vec<PathBuf> = result.candidates.iter().map(|c| c.path.clone()).collect();
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].ends_with("c.txt"));
    assert!(result.candidates.iter().all(|c| !c.keeper.ends_with("b.txt")));
    assert!(result
        .errors
        .iter()
        .any(|e| e.kind == ErrorKind::Scan && e.path.ends_with("b.txt")));
}

#[test]
fn test_modified_candidate_is_skipped_others_continue() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "dup").unwrap();
    fs::write(dir.path().join("b.txt"), "dup").unwrap();
    fs::write(dir.path().join("c.txt"), "dup").unwrap();
    let changed = dir.path().join("b.txt");

    let hook = PhaseHook {
        phase: PHASE_ACTION,
        hook: move || {
            fs::write(&changed, "changed after the scan").unwrap();
        },
    };
    let result = Runner::new(RunConfig::new(dir.path()))
        .with_progress_callback(Arc::new(hook))
        .run()
        .unwrap();

    assert_eq!(result.candidates.len(), 2);
    assert!(matches!(
        result.candidates[0].outcome,
        ActionOutcome::Failed { .. }
    ));
    assert!(matches!(
        result.candidates[1].outcome,
        ActionOutcome::Moved { .. }
    ));
    assert_eq!(result.failed_count(), 1);
    assert_eq!(result.moved_count(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::Action);
    assert_eq!(
        fs::read_to_string(dir.path().join("b.txt")).unwrap(),
        "changed after the scan"
    );
    assert!(!dir.path().join("c.txt").exists());
}

#[test]
fn test_interrupt_during_actions_skips_remaining() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "dup").unwrap();
    fs::write(dir.path().join("b.txt"), "dup").unwrap();
    fs::write(dir.path().join("c.txt"), "dup").unwrap();

    let flag = Arc::new(AtomicBool::new(false));
    let hook_flag = Arc::clone(&flag);
    let hook = PhaseHook {
        phase: PHASE_ACTION,
        hook: move || hook_flag.store(true, Ordering::SeqCst),
    };
    let result = Runner::new(RunConfig::new(dir.path()))
        .with_progress_callback(Arc::new(hook))
        .with_shutdown_flag(flag)
        .run()
        .unwrap();

    assert!(result.interrupted);
    assert_eq!(result.skipped_count(), 2);
    assert_eq!(result.bytes_reclaimed, 0);
    assert!(dir.path().join("b.txt").exists());
    assert!(dir.path().join("c.txt").exists());
}
