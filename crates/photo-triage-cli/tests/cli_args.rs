//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use photo_triage_test_support::SyntheticImageBuilder;
use predicates::prelude::*;

fn shoot_with_one_image() -> tempfile::TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    SyntheticImageBuilder::horizontal_gradient(32, 32)
        .save(temp_dir.path().join("one.png"))
        .unwrap();
    temp_dir
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("No paths specified"));
}

#[test]
fn test_subcommand_without_paths_fails() {
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg("stats");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("No paths specified"));
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg("/nonexistent/path/to/image.jpg");

    cmd.assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_empty_directory() {
    let temp_dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg(temp_dir.path());

    cmd.assert().code(0).stdout(predicate::str::is_empty());
}

// === Value Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    let dir = shoot_with_one_image();
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg("--format").arg("xml").arg(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

#[test]
fn test_invalid_filter_rejected() {
    let dir = shoot_with_one_image();
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg("--filter").arg("best").arg(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown filter 'best'"));
}

#[test]
fn test_invalid_sort_rejected() {
    let dir = shoot_with_one_image();
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg("--sort").arg("size").arg(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("score, date, name"));
}

#[test]
fn test_zero_concurrency_rejected() {
    let dir = shoot_with_one_image();
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg("--concurrency").arg("0").arg(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("concurrency must be at least 1"));
}

#[test]
fn test_valid_options_accepted() {
    let dir = shoot_with_one_image();
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.args(["view", "--filter", "all", "--sort", "name", "--concurrency", "2", "-q"])
        .arg(dir.path());

    cmd.assert().code(0);
}

#[test]
fn test_missing_action_log_is_an_error() {
    let dir = shoot_with_one_image();
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg("--actions")
        .arg(dir.path().join("missing.jsonl"))
        .arg(dir.path());

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read action log"));
}

// === Help and Version ===

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("--lock-decisions"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("photo-triage").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("photo-triage"));
}
