//! Edge case and error handling tests for drivetree

mod harness;

use std::fs;

use assert_cmd::Command;
use harness::{Workspace, run_drivetree};
use predicates::prelude::*;

fn drivetree(ws: &Workspace) -> Command {
    Command::from_std(ws.command())
}

// ============================================================================
// Path resolution
// ============================================================================

#[test]
fn test_missing_path_fails() {
    let ws = Workspace::new();
    ws.store.add_dir("/docs");
    drivetree(&ws)
        .arg("--store")
        .arg(ws.store.path())
        .args(["ls", "/nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("drivetree: listing '/nope' failed"));
}

#[test]
fn test_ambiguous_pattern_fails() {
    let ws = Workspace::new();
    ws.store.add_dir("/docs/2023");
    ws.store.add_dir("/docs/2024");
    drivetree(&ws)
        .arg("--store")
        .arg(ws.store.path())
        .args(["ls", "/docs/20*"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("matches 2 paths"));
}

#[test]
fn test_pattern_without_match_fails() {
    let ws = Workspace::new();
    ws.store.add_dir("/docs");
    drivetree(&ws)
        .arg("--store")
        .arg(ws.store.path())
        .args(["ls", "/docs/*.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no matching path"));
}

#[test]
fn test_ls_of_file_fails() {
    let ws = Workspace::new();
    ws.store.add_file("/a.txt", "x");
    let (_stdout, stderr, success) = run_drivetree(&ws, &["ls", "/a.txt"]);
    assert!(!success);
    assert!(stderr.contains("not a directory"), "{}", stderr);
}

#[test]
fn test_dot_dot_cannot_escape_root() {
    let ws = Workspace::new();
    ws.store.add_file("/a.txt", "x");
    let (stdout, _stderr, success) = run_drivetree(&ws, &["--cwd", "/", "ls", "../.."]);
    assert!(success);
    assert!(stdout.contains("current directory: /\n"));
    assert!(stdout.contains("a.txt"));
}

// ============================================================================
// Store and config setup
// ============================================================================

#[test]
fn test_no_store_configured() {
    let ws = Workspace::new();
    drivetree(&ws)
        .args(["ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no store given"));
}

#[test]
fn test_store_must_exist() {
    let ws = Workspace::new();
    drivetree(&ws)
        .args(["--store", "/definitely/not/a/store", "ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open store"));
}

#[test]
fn test_missing_explicit_config() {
    let ws = Workspace::new();
    let missing = ws.work_dir().join("missing.toml");
    drivetree(&ws)
        .arg("--config")
        .arg(&missing)
        .arg("--store")
        .arg(ws.store.path())
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_invalid_config() {
    let ws = Workspace::new();
    ws.write_config("[index]\nthrottle = \"whenever\"\n");
    drivetree(&ws)
        .arg("--store")
        .arg(ws.store.path())
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn test_invalid_throttle_flag() {
    let ws = Workspace::new();
    ws.store.add_dir("/docs");
    drivetree(&ws)
        .arg("--store")
        .arg(ws.store.path())
        .args(["createfileindex", "/docs", "--throttle", "soon"])
        .assert()
        .failure();
    assert!(!ws.work_dir().join("docs_index.txt").exists());
}

// ============================================================================
// Listing contents
// ============================================================================

#[test]
fn test_empty_directory() {
    let ws = Workspace::new();
    ws.store.add_dir("/empty");
    let (stdout, _stderr, success) = run_drivetree(&ws, &["ls", "/empty"]);
    assert!(success);
    assert!(stdout.contains("total: 0B"));
    assert!(stdout.contains("files: 0, directories: 0"));
}

#[test]
fn test_long_listing_repeats_path() {
    let ws = Workspace::new();
    for i in 0..50 {
        ws.store.add_file(&format!("/many/f{:02}.txt", i), "x");
    }
    let (stdout, _stderr, success) = run_drivetree(&ws, &["ls", "/many"]);
    assert!(success);
    assert_eq!(stdout.matches("current directory: /many").count(), 2);
}

#[test]
fn test_unicode_names() {
    let ws = Workspace::new();
    ws.store.add_file("/文档/报告.txt", "hello");
    let (stdout, _stderr, success) = run_drivetree(&ws, &["ls", "/文档"]);
    assert!(success);
    assert!(stdout.contains("报告.txt"));
    assert!(stdout.contains("5B"));
}

#[test]
fn test_state_dir_is_hidden() {
    let ws = Workspace::new();
    ws.store.add_sized_file("/docs/a.txt", 10);
    let (_stdout, _stderr, success) =
        run_drivetree(&ws, &["createfileindex", "/docs", "--throttle", "0s"]);
    assert!(success);
    assert!(ws.store.path().join(".drivetree").exists());

    let (stdout, _stderr, success) = run_drivetree(&ws, &["ls", "/"]);
    assert!(success);
    assert!(!stdout.contains(".drivetree"));
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_skipped() {
    use std::os::unix::fs::symlink;

    let ws = Workspace::new();
    ws.store.add_file("/real/file.txt", "x");
    symlink(ws.store.path().join("real"), ws.store.path().join("loop"))
        .expect("Failed to create symlink");
    symlink(ws.store.path(), ws.store.path().join("real/up")).expect("Failed to create symlink");

    let (stdout, stderr, success) =
        run_drivetree(&ws, &["createfileindex", "/", "--throttle", "0s"]);
    assert!(success, "{}", stderr);
    assert!(stdout.contains("shareID"));

    let index = fs::read_to_string(ws.work_dir().join("root_index.txt")).unwrap();
    assert!(index.starts_with("directories: 1, files: 1, size: 1B"));
    assert!(!index.contains("loop"));
    assert!(!index.contains("up"));
}

// ============================================================================
// Index file handling
// ============================================================================

#[test]
fn test_failed_index_leaves_no_file() {
    let ws = Workspace::new();
    ws.store.add_file("/a.txt", "x");
    drivetree(&ws)
        .arg("--store")
        .arg(ws.store.path())
        .args(["createfileindex", "/a.txt", "--throttle", "0s"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
    assert_eq!(fs::read_dir(ws.work_dir()).unwrap().count(), 0);
}

#[test]
fn test_quiet_and_verbose_logging() {
    let ws = Workspace::new();
    ws.store.add_file("/docs/a.txt", "x");

    let (_stdout, stderr, success) =
        run_drivetree(&ws, &["-v", "createfileindex", "/docs", "--throttle", "0s"]);
    assert!(success);
    assert!(stderr.contains("list /docs"), "{}", stderr);

    fs::remove_file(ws.work_dir().join("docs_index.txt")).unwrap();
    let (_stdout, stderr, success) =
        run_drivetree(&ws, &["-q", "createfileindex", "/docs", "--throttle", "0s"]);
    assert!(success);
    assert!(stderr.is_empty(), "{}", stderr);
}
