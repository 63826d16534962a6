use dupremover::actions::{Action, ActionOutcome};
use dupremover::duplicates::Mode;
use dupremover::runner::{RunConfig, Runner};
use dupremover::scanner::QUARANTINE_DIR_NAME;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn files_under(dir: &Path) -> usize {
    let mut count = 0;
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let file_type = entry.file_type().unwrap();
        if file_type.is_dir() {
            count += files_under(&entry.path());
        } else {
            count += 1;
        }
    }
    count
}

fn destinations(outcomes: impl IntoIterator<Item = ActionOutcome>) -> Vec<PathBuf> {
    outcomes
        .into_iter()
        .filter_map(|o| match o {
            ActionOutcome::Moved { destination } => Some(destination),
            _ => None,
        })
        .collect()
}

#[test]
fn test_move_never_overwrites_same_names() {
    let dir = tempdir().unwrap();
    for sub in ["one", "two", "three"] {
        let d = dir.path().join(sub);
        fs::create_dir(&d).unwrap();
        fs::write(d.join("photo.jpg"), "identical").unwrap();
    }

    let result = Runner::new(RunConfig::new(dir.path())).run().unwrap();
    assert_eq!(result.moved_count(), 2);

    let quarantine = dir.path().join(QUARANTINE_DIR_NAME);
    let moved = destinations(result.candidates.iter().map(|c| c.outcome.clone()));
    let unique: HashSet<_> = moved.iter().collect();
    assert_eq!(unique.len(), 2);
    assert!(quarantine.join("photo.jpg").exists());
    assert!(quarantine.join("photo(1).jpg").exists());
    for path in &moved {
        assert_eq!(fs::read_to_string(path).unwrap(), "identical");
    }
}

#[test]
fn test_move_keeps_existing_quarantine_content() {
    let dir = tempdir().unwrap();
    let quarantine = dir.path().join(QUARANTINE_DIR_NAME);
    fs::create_dir(&quarantine).unwrap();
    fs::write(quarantine.join("b.txt"), "from an earlier run").unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();

    let result = Runner::new(RunConfig::new(dir.path())).run().unwrap();

    assert_eq!(result.moved_count(), 1);
    assert_eq!(
        fs::read_to_string(quarantine.join("b.txt")).unwrap(),
        "from an earlier run"
    );
    assert_eq!(fs::read_to_string(quarantine.join("b(1).txt")).unwrap(), "X");
}

#[test]
fn test_delete_removes_candidates_and_counts_bytes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), vec![7u8; 1000]).unwrap();
    fs::write(dir.path().join("b.bin"), vec![7u8; 1000]).unwrap();
    fs::write(dir.path().join("c.bin"), vec![7u8; 1000]).unwrap();
    fs::write(dir.path().join("d.txt"), "hello").unwrap();
    fs::write(dir.path().join("e.txt"), "hello").unwrap();
    fs::write(dir.path().join("f.txt"), "unique").unwrap();
    let before = files_under(dir.path());

    let result = Runner::new(
        RunConfig::new(dir.path())
            .with_action(Action::Delete)
            .with_delete_confirmed(true),
    )
    .run()
    .unwrap();

    let n = result.candidates.len();
    assert_eq!(n, 3);
    assert_eq!(result.deleted_count(), n);
    assert_eq!(files_under(dir.path()), before - n);
    assert_eq!(result.bytes_reclaimed, result.candidate_bytes());
    assert_eq!(result.bytes_reclaimed, 2005);
    assert!(result.quarantine_dir.is_none());
    assert!(!dir.path().join(QUARANTINE_DIR_NAME).exists());
}

#[test]
fn test_delete_across_roots_only_touches_removal_root() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    fs::write(a.path().join("keep.txt"), "data").unwrap();
    fs::write(b.path().join("dupe.txt"), "data").unwrap();

    let result = Runner::new(
        RunConfig::new(a.path())
            .with_root_b(b.path())
            .with_mode(Mode::AvsB)
            .with_action(Action::Delete)
            .with_delete_confirmed(true),
    )
    .run()
    .unwrap();

    assert_eq!(result.deleted_count(), 1);
    assert_eq!(result.bytes_reclaimed, 4);
    assert!(a.path().join("keep.txt").exists());
    assert!(!b.path().join("dupe.txt").exists());
}

#[test]
fn test_move_reports_quarantine_dir() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "same").unwrap();
    fs::write(dir.path().join("b"), "same").unwrap();

    let result = Runner::new(RunConfig::new(dir.path())).run().unwrap();

    let quarantine = result.quarantine_dir.clone().unwrap();
    assert_eq!(
        quarantine.file_name().unwrap().to_string_lossy(),
        QUARANTINE_DIR_NAME
    );
    assert_eq!(result.bytes_reclaimed, 4);
    assert_eq!(result.failed_count(), 0);
}

#[test]
fn test_blocked_quarantine_fails_each_move_with_its_own_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(QUARANTINE_DIR_NAME), "not a folder").unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();
    fs::write(dir.path().join("c.txt"), "X").unwrap();

    let result = Runner::new(RunConfig::new(dir.path())).run().unwrap();

    assert_eq!(result.candidates.len(), 2);
    assert_eq!(result.failed_count(), 2);
    assert_eq!(result.moved_count(), 0);
    assert!(result.quarantine_dir.is_none());
    assert_eq!(result.errors.len(), 2);
    for error in &result.errors {
        assert_eq!(error.path, dir.path().canonicalize().unwrap().join(QUARANTINE_DIR_NAME));
        assert!(error.reason.starts_with("cannot create quarantine folder"));
    }
    assert_eq!(files_under(dir.path()), 4);
    assert!(dir.path().join(QUARANTINE_DIR_NAME).is_file());
}
