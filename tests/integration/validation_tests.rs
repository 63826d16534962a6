use dupremover::actions::Action;
use dupremover::duplicates::Mode;
use dupremover::runner::{RunConfig, RunError, Runner};
use dupremover::scanner::QUARANTINE_DIR_NAME;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn seed(dir: &Path) {
    fs::write(dir.join("a.txt"), "X").unwrap();
    fs::write(dir.join("b.txt"), "X").unwrap();
}

fn assert_untouched(dir: &Path) {
    assert!(dir.join("a.txt").exists());
    assert!(dir.join("b.txt").exists());
    assert!(!dir.join(QUARANTINE_DIR_NAME).exists());
}

#[test]
fn test_missing_root_b_mutates_nothing() {
    let a = tempdir().unwrap();
    seed(a.path());

    let err = Runner::new(RunConfig::new(a.path()).with_mode(Mode::AvsB))
        .run()
        .unwrap_err();

    assert!(matches!(err, RunError::MissingRootB(Mode::AvsB)));
    assert_untouched(a.path());
}

#[test]
fn test_same_roots_mutate_nothing() {
    let a = tempdir().unwrap();
    seed(a.path());
    let same = a.path().join(".").join("sub").join("..");
    fs::create_dir(a.path().join("sub")).unwrap();

    let err = Runner::new(
        RunConfig::new(a.path())
            .with_root_b(&same)
            .with_mode(Mode::BvsA),
    )
    .run()
    .unwrap_err();

    assert!(matches!(err, RunError::SameRoots(_)));
    assert_untouched(a.path());
}

#[test]
fn test_unconfirmed_delete_mutates_nothing() {
    let a = tempdir().unwrap();
    seed(a.path());

    let err = Runner::new(RunConfig::new(a.path()).with_action(Action::Delete))
        .run()
        .unwrap_err();

    assert!(matches!(err, RunError::DeleteNotConfirmed));
    assert_untouched(a.path());
}

#[test]
fn test_unconfirmed_delete_allowed_in_dry_run() {
    let a = tempdir().unwrap();
    seed(a.path());

    let result = Runner::new(
        RunConfig::new(a.path())
            .with_action(Action::Delete)
            .with_dry_run(true),
    )
    .run()
    .unwrap();

    assert_eq!(result.candidates.len(), 1);
    assert_untouched(a.path());
}

#[test]
fn test_overlapping_roots_rejected_when_recursive() {
    let a = tempdir().unwrap();
    seed(a.path());
    let nested = a.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("c.txt"), "X").unwrap();

    let err = Runner::new(
        RunConfig::new(a.path())
            .with_root_b(&nested)
            .with_mode(Mode::AvsB),
    )
    .run()
    .unwrap_err();
    assert!(matches!(err, RunError::OverlappingRoots { .. }));
    assert_untouched(a.path());
    assert!(nested.join("c.txt").exists());

    // A flat scan of each root cannot see the other's files
    let result = Runner::new(
        RunConfig::new(a.path())
            .with_root_b(&nested)
            .with_mode(Mode::AvsB)
            .with_recursive(false)
            .with_dry_run(true),
    )
    .run()
    .unwrap();
    assert_eq!(result.candidates.len(), 1);
}

#[test]
fn test_root_not_found_or_not_directory() {
    let a = tempdir().unwrap();
    let missing = a.path().join("does-not-exist");
    let err = Runner::new(RunConfig::new(&missing)).run().unwrap_err();
    assert!(matches!(err, RunError::PathNotFound(_)));

    let file = a.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    let err = Runner::new(RunConfig::new(&file)).run().unwrap_err();
    assert!(matches!(err, RunError::NotADirectory(_)));

    let err = Runner::new(
        RunConfig::new(a.path())
            .with_root_b(&missing)
            .with_mode(Mode::AvsB),
    )
    .run()
    .unwrap_err();
    assert!(matches!(err, RunError::PathNotFound(_)));
    assert!(err.is_invalid_input());
}
