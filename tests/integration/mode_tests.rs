use dupremover::actions::ActionOutcome;
use dupremover::duplicates::Mode;
use dupremover::runner::{RunConfig, Runner};
use dupremover::scanner::QUARANTINE_DIR_NAME;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn names(paths: impl IntoIterator<Item = PathBuf>) -> Vec<String> {
    paths
        .into_iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().file_type().unwrap().is_file())
        .count()
}

#[test]
fn test_within_a_example() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();
    fs::write(dir.path().join("c.txt"), "Y").unwrap();

    let result = Runner::new(RunConfig::new(dir.path()).with_dry_run(true))
        .run()
        .unwrap();

    assert_eq!(result.duplicate_group_count, 1);
    assert_eq!(
        names(result.candidates.iter().map(|c| c.path.clone())),
        vec!["b.txt"]
    );
    assert_eq!(
        names(result.candidates.iter().map(|c| c.keeper.clone())),
        vec!["a.txt"]
    );
    assert!(dir.path().join("c.txt").exists());
}

#[test]
fn test_same_content_grouped_regardless_of_name_and_location() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("x").join("y");
    fs::create_dir_all(&deep).unwrap();
    fs::write(dir.path().join("report.pdf"), "same bytes").unwrap();
    fs::write(deep.join("totally-different-name.bin"), "same bytes").unwrap();

    let result = Runner::new(RunConfig::new(dir.path()).with_dry_run(true))
        .run()
        .unwrap();

    assert_eq!(result.duplicate_group_count, 1);
    assert_eq!(
        names(result.candidates.iter().map(|c| c.path.clone())),
        vec!["totally-different-name.bin"]
    );
}

#[test]
fn test_different_sizes_never_grouped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("short"), "abc").unwrap();
    fs::write(dir.path().join("long"), "abcabc").unwrap();
    fs::write(dir.path().join("longer"), "abcabcabc").unwrap();

    let result = Runner::new(RunConfig::new(dir.path())).run().unwrap();

    assert!(result.is_empty());
    assert_eq!(result.scanned_count, 3);
    assert_eq!(count_files(dir.path()), 3);
}

#[test]
fn test_same_size_different_content_not_grouped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one"), "aaaa").unwrap();
    fs::write(dir.path().join("two"), "bbbb").unwrap();

    let result = Runner::new(RunConfig::new(dir.path())).run().unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_a_vs_b_example() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    fs::write(a.path().join("x.txt"), "X").unwrap();
    fs::write(b.path().join("x1.txt"), "X").unwrap();
    fs::write(b.path().join("x2.txt"), "X").unwrap();
    fs::write(b.path().join("y.txt"), "Y").unwrap();

    let result = Runner::new(
        RunConfig::new(a.path())
            .with_root_b(b.path())
            .with_mode(Mode::AvsB),
    )
    .run()
    .unwrap();

    assert_eq!(
        names(result.candidates.iter().map(|c| c.path.clone())),
        vec!["x1.txt", "x2.txt"]
    );
    assert_eq!(result.moved_count(), 2);
    assert!(a.path().join("x.txt").exists());
    assert!(b.path().join("y.txt").exists());
    assert!(!b.path().join("x1.txt").exists());
    assert!(!b.path().join("x2.txt").exists());

    // Quarantine lives in B, A is untouched
    let quarantine = b.path().join(QUARANTINE_DIR_NAME);
    assert_eq!(count_files(&quarantine), 2);
    assert!(!a.path().join(QUARANTINE_DIR_NAME).exists());
}

#[test]
fn test_a_vs_b_ignores_duplicates_within_a() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    fs::write(a.path().join("1.txt"), "X").unwrap();
    fs::write(a.path().join("2.txt"), "X").unwrap();
    fs::write(b.path().join("other.txt"), "Z").unwrap();

    let result = Runner::new(RunConfig::new(a.path()).with_root_b(b.path()).with_mode(Mode::AvsB))
        .run()
        .unwrap();

    assert!(result.is_empty());
    assert!(a.path().join("2.txt").exists());
}

#[test]
fn test_b_vs_a_removes_from_a() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    fs::write(a.path().join("copy.txt"), "shared").unwrap();
    fs::write(a.path().join("unique.txt"), "only in a").unwrap();
    fs::write(b.path().join("original.txt"), "shared").unwrap();

    let result = Runner::new(RunConfig::new(a.path()).with_root_b(b.path()).with_mode(Mode::BvsA))
        .run()
        .unwrap();

    assert_eq!(result.moved_count(), 1);
    assert!(!a.path().join("copy.txt").exists());
    assert!(a.path().join("unique.txt").exists());
    assert!(b.path().join("original.txt").exists());
    assert!(a.path().join(QUARANTINE_DIR_NAME).join("copy.txt").exists());
    assert_eq!(
        names(result.candidates.iter().map(|c| c.keeper.clone())),
        vec!["original.txt"]
    );
}

#[test]
fn test_non_recursive_ignores_subdirectories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("top.txt"), "X").unwrap();
    fs::write(sub.join("nested.txt"), "X").unwrap();

    let flat = Runner::new(RunConfig::new(dir.path()).with_recursive(false))
        .run()
        .unwrap();
    assert_eq!(flat.scanned_count, 1);
    assert!(flat.is_empty());

    let deep = Runner::new(
        RunConfig::new(dir.path())
            .with_recursive(true)
            .with_dry_run(true),
    )
    .run()
    .unwrap();
    assert_eq!(deep.scanned_count, 2);
    assert_eq!(deep.candidates.len(), 1);
}

#[test]
fn test_rerun_after_move_finds_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();
    fs::write(dir.path().join("c.txt"), "X").unwrap();

    let first = Runner::new(RunConfig::new(dir.path())).run().unwrap();
    assert_eq!(first.moved_count(), 2);

    let second = Runner::new(RunConfig::new(dir.path())).run().unwrap();
    assert!(second.is_empty());
    assert_eq!(second.scanned_count, 1);
}

#[test]
fn test_empty_files_are_duplicates_unless_skipped() {
    let dir = tempdir().unwrap();
    fs::File::create(dir.path().join("empty1")).unwrap();
    fs::File::create(dir.path().join("empty2")).unwrap();

    let counted = Runner::new(RunConfig::new(dir.path()).with_dry_run(true))
        .run()
        .unwrap();
    assert_eq!(counted.candidates.len(), 1);

    let skipped = Runner::new(RunConfig::new(dir.path()).with_skip_empty(true))
        .run()
        .unwrap();
    assert!(skipped.is_empty());
    assert_eq!(skipped.scanned_count, 0);
}

#[test]
fn test_dry_run_touches_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();

    let result = Runner::new(RunConfig::new(dir.path()).with_dry_run(true))
        .run()
        .unwrap();

    assert!(result.dry_run);
    assert_eq!(result.skipped_count(), 1);
    assert_eq!(result.bytes_reclaimed, 0);
    assert!(dir.path().join("b.txt").exists());
    assert!(!dir.path().join(QUARANTINE_DIR_NAME).exists());
    assert!(matches!(
        result.candidates[0].outcome,
        ActionOutcome::Skipped { .. }
    ));
}
