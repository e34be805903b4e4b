// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::Repository;
use serial_test::serial;
use tempfile::TempDir;

fn run_binary(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--bin", "changelog-update", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
#[serial]
fn test_help_shows_documentation() {
    let output = run_binary(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("changelog-update"));
    assert!(stdout.contains("Changes since"));
    assert!(stdout.contains("--usage"));
}

#[test]
#[serial]
fn test_man_alias_shows_documentation() {
    let output = run_binary(&["--man"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Dot-zero tags"));
}

#[test]
#[serial]
fn test_usage_is_short() {
    let output = run_binary(&["--usage"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Usage:"));
    assert!(!stdout.contains("Dot-zero tags"));
}

#[test]
#[serial]
fn test_question_mark_is_short_usage() {
    let output = run_binary(&["-?"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Usage:"));
    assert!(!stdout.contains("Dot-zero tags"));
}

#[test]
#[serial]
fn test_missing_tags_is_usage_error() {
    let output = run_binary(&[]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("<TAG>"));
}

#[test]
#[serial]
fn test_unknown_flag_rejected() {
    let output = run_binary(&["--force", "v1.4.2"]);
    assert_eq!(output.status.code(), Some(2));
}

// Run the built binary directly so the working directory can be chosen
fn run_binary_in(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_changelog-update"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute command")
}

#[test]
#[serial]
fn test_outside_repository_exits_with_failure() {
    let dir = TempDir::new().expect("Could not create temp dir");

    let output = run_binary_in(dir.path(), &["v1.4.2"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERROR:"), "stderr was: {}", stderr);
}

#[test]
#[serial]
fn test_noop_run_exits_successfully() {
    let dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(dir.path()).expect("Could not init git repo");
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }
    repo.remote("origin", "git@github.com:someone/kubernetes.git")
        .unwrap();

    fs::write(dir.path().join("README.md"), "readme\n").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let signature = repo.signature().unwrap();
    let commit_id = repo
        .commit(None, &signature, &signature, "Initial commit", &tree, &[])
        .unwrap();
    let commit = repo.find_commit(commit_id).unwrap();
    repo.branch("master", &commit, true).unwrap();
    repo.set_head("refs/heads/master").unwrap();

    // A dot-zero tag is skipped, so nothing gets committed.
    let output = run_binary_in(dir.path(), &["v1.5.0"]);

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("Skipping Major milestone release v1.5.0"),
        "stderr was: {}",
        stderr
    );
}
