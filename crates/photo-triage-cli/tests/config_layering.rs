//! Configuration layering tests.
//!
//! Runs the binary from a directory holding `.photo-triage.toml` with an
//! isolated XDG config home, and checks which values win.

#![allow(clippy::unwrap_used, deprecated)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use photo_triage_test_support::SyntheticImageBuilder;
use predicates::prelude::*;

/// A working directory with one image under `shoot/` and an empty XDG home.
struct Workspace {
    root: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("shoot")).unwrap();
        fs::create_dir_all(root.path().join("xdg")).unwrap();
        SyntheticImageBuilder::horizontal_gradient(48, 48)
            .save(root.path().join("shoot").join("one.png"))
            .unwrap();
        SyntheticImageBuilder::checkerboard(48, 48, 4)
            .save(root.path().join("shoot").join("two.png"))
            .unwrap();
        Self { root }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn project_config(&self, toml: &str) {
        fs::write(self.path().join(".photo-triage.toml"), toml).unwrap();
    }

    fn xdg_config(&self, toml: &str) {
        let dir = self.path().join("xdg").join("photo-triage");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), toml).unwrap();
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("photo-triage").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .arg("-q");
        cmd
    }
}

#[test]
fn test_project_config_sets_format() {
    let ws = Workspace::new();
    ws.project_config("[output]\nformat = 'json'\n");

    let output = ws.command().arg("shoot").output().unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_flag_overrides_project_config() {
    let ws = Workspace::new();
    ws.project_config("[output]\nformat = 'json'\n");

    let output = ws
        .command()
        .args(["--format", "jsonl", "shoot"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.starts_with('{'));
}

#[test]
fn test_project_config_sets_view_defaults() {
    let ws = Workspace::new();
    ws.project_config("[view]\nfilter = 'selected'\n");

    ws.command()
        .arg("shoot")
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());

    ws.command()
        .args(["--filter", "all", "shoot"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("one.png"));
}

#[test]
fn test_project_config_overrides_xdg() {
    let ws = Workspace::new();
    ws.xdg_config("[view]\nsort = 'score'\nfilter = 'selected'\n");
    ws.project_config("[view]\nsort = 'name'\n");

    let output = ws.command().arg("shoot").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    // filter comes from XDG, so nothing is shown
    assert!(stdout.is_empty(), "{stdout}");

    let output = ws
        .command()
        .args(["--filter", "all", "shoot"])
        .output()
        .unwrap();
    let names: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| {
            let row: serde_json::Value = serde_json::from_str(l).unwrap();
            row["name"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(names, ["one.png", "two.png"]);
}

#[test]
fn test_project_config_locks_decisions() {
    let ws = Workspace::new();
    ws.project_config("[review]\nlock_decisions = true\n");
    fs::write(
        ws.path().join("actions.jsonl"),
        "{\"action\":\"review\",\"id\":\"p1\",\"decision\":\"approved\"}\n\
         {\"action\":\"review\",\"id\":\"p1\",\"decision\":\"rejected\"}\n",
    )
    .unwrap();

    ws.command()
        .args(["--actions", "actions.jsonl", "shoot"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot change review"));
}

#[test]
fn test_invalid_config_value_warns() {
    let ws = Workspace::new();
    ws.project_config("[output]\nformat = 'xml'\n");

    ws.command()
        .arg("shoot")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("warning:"))
        .stderr(predicate::str::contains("output.format"));
}

#[test]
fn test_malformed_config_is_ignored() {
    let ws = Workspace::new();
    ws.project_config("this is not toml = = =");

    ws.command()
        .arg("shoot")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("two.png"));
}
