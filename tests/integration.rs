//! Integration tests for the banstore binary.
//!
//! Every test works on a throwaway database under a temporary directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Run banstore against `db` and return output
fn run_banstore(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_banstore"))
        .arg("--db")
        .arg(db)
        .args(args)
        .output()
        .expect("Failed to execute banstore")
}

/// Run banstore with `input` on stdin
fn run_banstore_stdin(db: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_banstore"))
        .arg("--db")
        .arg(db)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn banstore");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().expect("Failed to wait for banstore")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_banstore"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("denylist"));
    assert!(out.contains("purge"));
}

#[test]
fn test_add_then_list() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");

    let output = run_banstore(&db, &["add", "10.0.0.1", "192.168.0.0/16", "--ttl", "1h"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_banstore(&db, &["list"]);
    assert!(output.status.success());
    let mut lines: Vec<String> = stdout(&output).lines().map(String::from).collect();
    lines.sort();
    assert_eq!(lines, vec!["10.0.0.1", "192.168.0.0/16"]);
}

#[test]
fn test_add_creates_database_directory() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("var/lib/banstore/bans.redb");
    let output = run_banstore(&db, &["add", "10.0.0.1"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(db.exists());
}

#[test]
fn test_add_from_stdin_skips_invalid() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");

    let output = run_banstore_stdin(
        &db,
        &["-b", "ssh", "add", "-d", "from stdin"],
        "# list\n203.0.113.7\nbogus\n\n2001:db8::/32\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("bogus"));

    let output = run_banstore(&db, &["-b", "ssh", "list", "--format", "json"]);
    let records: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r["description"] == "from stdin"));
    assert!(records.iter().all(|r| r["live"] == true));
}

#[test]
fn test_bad_ttl_is_fatal() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");
    let output = run_banstore(&db, &["add", "10.0.0.1", "--ttl", "soon"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("TTL"));
}

#[test]
fn test_query_exit_status() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");
    run_banstore(&db, &["add", "10.0.0.1"]);

    let output = run_banstore(&db, &["query", "10.0.0.1"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("DENYLISTED"));

    let output = run_banstore(&db, &["query", "10.0.0.2"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("NOT"));
}

#[test]
fn test_fetch_shows_record() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");
    run_banstore(&db, &["add", "10.0.0.1", "-d", "manual entry"]);

    let output = run_banstore(&db, &["fetch", "10.0.0.1"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("manual entry"));
    assert!(out.contains("LIVE"));

    let output = run_banstore(&db, &["fetch", "10.9.9.9"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("not found"));
}

#[test]
fn test_purge_and_buckets() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");
    run_banstore(&db, &["-b", "web", "add", "10.0.0.1", "10.0.0.2"]);
    run_banstore(&db, &["-b", "ssh", "add", "10.0.0.3"]);

    let output = run_banstore(&db, &["buckets"]);
    assert_eq!(stdout(&output), "ssh\nweb\n");

    let output = run_banstore(&db, &["-b", "web", "purge", "10.0.0.1", "10.0.0.9"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Removed 1 of 2"));

    let output = run_banstore(&db, &["-b", "web", "list"]);
    assert_eq!(stdout(&output), "10.0.0.2\n");
}

#[test]
fn test_purge_missing_bucket_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");
    let output = run_banstore(&db, &["-b", "ghost", "purge", "10.0.0.1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no ghost bucket found"));
}

#[test]
fn test_list_missing_bucket_is_empty() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");
    let output = run_banstore(&db, &["-b", "ghost", "list"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_dump_text_and_template() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");
    run_banstore(&db, &["add", "10.0.0.1", "-d", "note"]);

    let output = run_banstore(&db, &["dump"]);
    let out = stdout(&output);
    assert!(out.ends_with(" 10.0.0.1 note\n"), "got: {}", out);

    let output = run_banstore(&db, &["dump", "--template", "{address}|{description}\\n"]);
    assert_eq!(stdout(&output), "10.0.0.1|note\n");
}

#[test]
fn test_scan_with_print() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("auth.log");
    std::fs::write(
        &log,
        "sshd: Failed password for root from 198.51.100.4 port 22\n\
         sshd: Failed password for root from 10.0.0.8 port 22\n",
    )
    .unwrap();
    let db = dir.path().join("scan.redb");
    let config = dir.path().join("scan.yaml");
    std::fs::write(
        &config,
        format!(
            "sources: [{}]\n\
             patterns: ['Failed password for \\S+ from (\\S+)']\n\
             database: {}\n\
             bucket: ssh\n\
             ttl: 2d\n\
             network_whitelist: [10.0.0.0/8]\n\
             print_template: \"{{address}}\\n\"\n",
            log.display(),
            db.display()
        ),
    )
    .unwrap();

    let unused = dir.path().join("unused.redb");
    let output = run_banstore(&unused, &["scan", "--config", config.to_str().unwrap(), "--print"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "198.51.100.4/32\n");
    assert!(!unused.exists());
}

#[test]
fn test_scan_bad_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("scan.yaml");
    std::fs::write(&config, "sources: []\nbucket: ssh\n").unwrap();
    let output = run_banstore(&dir.path().join("x.redb"), &["scan", "-c", config.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No valid source defined"));
}

#[test]
fn test_empty_bucket_is_rejected() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bans.redb");
    for args in [
        vec!["--bucket", "", "list"],
        vec!["--bucket", "", "dump"],
        vec!["--bucket", "", "fetch", "10.0.0.1"],
        vec!["--bucket", "", "query", "10.0.0.1"],
        vec!["--bucket", "", "purge", "10.0.0.1"],
        vec!["--bucket", "", "add", "10.0.0.1"],
    ] {
        let output = run_banstore(&db, &args);
        assert_eq!(output.status.code(), Some(1), "args: {:?}", args);
        assert!(stderr(&output).contains("Bucket name cannot be empty"), "args: {:?}", args);
    }
}
