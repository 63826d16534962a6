use clap::Parser;
use dupremover::cli::{Cli, OutputFormat};
use dupremover::duplicates::Mode;
use dupremover::error::ExitCode;
use dupremover::run_app;
use dupremover::scanner::QUARANTINE_DIR_NAME;
use std::fs;
use tempfile::tempdir;

fn parse(args: &[&str]) -> Cli {
    let mut full = vec!["dupremover"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).unwrap()
}

#[test]
fn test_cli_defaults_follow_directory_count() {
    let one = parse(&["/a"]);
    assert_eq!(one.to_run_config().mode, Mode::WithinA);
    assert_eq!(one.output, OutputFormat::Text);

    let two = parse(&["/a", "/b"]);
    assert_eq!(two.to_run_config().mode, Mode::AvsB);
}

#[test]
fn test_run_app_moves_and_reports_success() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();
    let root = dir.path().to_str().unwrap();

    let code = run_app(parse(&["-q", root, "--output", "json"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(!dir.path().join("b.txt").exists());
    assert!(dir.path().join(QUARANTINE_DIR_NAME).join("b.txt").exists());
}

#[test]
fn test_run_app_no_duplicates_exit_code() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only.txt"), "X").unwrap();
    let root = dir.path().to_str().unwrap();

    let code = run_app(parse(&["-q", root, "--output", "csv"])).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_run_app_delete_with_yes() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    fs::write(a.path().join("keep.txt"), "same").unwrap();
    fs::write(b.path().join("drop.txt"), "same").unwrap();

    let code = run_app(parse(&[
        "-q",
        a.path().to_str().unwrap(),
        b.path().to_str().unwrap(),
        "--action",
        "delete",
        "--yes",
        "--output",
        "json",
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(a.path().join("keep.txt").exists());
    assert!(!b.path().join("drop.txt").exists());
}

#[test]
fn test_run_app_dry_run_delete_needs_no_prompt() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();
    let root = dir.path().to_str().unwrap();

    let code = run_app(parse(&[
        "-q", root, "--action", "delete", "--dry-run", "--output", "json",
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_run_app_bad_root_is_general_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = run_app(parse(&["-q", missing.to_str().unwrap()])).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(format!("{err:#}").contains("Path not found"));
}
