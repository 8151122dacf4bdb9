//! End-to-end runs of the `cifinder` binary on a stored session.
//!
//! None of these reach the backend: they either fail validation first or
//! only read the session file.

mod common;

use assert_cmd::Command;
use common::{read_to_string, session_in_temp_dir};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn cifinder(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("cifinder").unwrap();
    cmd.current_dir(dir)
        .env_remove("CIFINDER_BACKEND_URL")
        .env_remove("RUST_LOG")
        .env("CIFINDER_QUIET", "1")
        .arg("--plain");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_upload_rejects_non_ste_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("report.txt"), "data").unwrap();

    let output = cifinder(temp_dir.path())
        .args(["upload", "report.txt"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("This file is not a ste file."), "{stderr}");
    assert!(!temp_dir.path().join(".cifinder-session.json").exists());
}

#[test]
fn test_search_rejects_topk_over_limit() {
    let (temp_dir, session_path) = session_in_temp_dir();
    let before = read_to_string(&session_path);

    let output = cifinder(temp_dir.path())
        // Nothing listens here; validation must fail first
        .args(["--backend", "http://127.0.0.1:9", "search", "--session"])
        .arg(&session_path)
        .args(["--topk", "101"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("topk must be between 0 and 100"), "{stderr}");
    assert_eq!(read_to_string(&session_path), before);
}

#[test]
fn test_results_lists_candidates_by_score() {
    let (temp_dir, session_path) = session_in_temp_dir();

    let stdout = stdout_of(
        cifinder(temp_dir.path())
            .args(["results", "--format", "json", "--session"])
            .arg(&session_path),
    );
    let json: Value = serde_json::from_str(&stdout).unwrap();

    let indices: Vec<u64> = json["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![1, 0, 2]);
    assert_eq!(json["total"], 3);
    assert_eq!(json["filters"]["visible"], serde_json::json!([1, 0, 2]));
}

#[test]
fn test_results_filter_narrows_terminal_output() {
    let (temp_dir, session_path) = session_in_temp_dir();

    let stdout = stdout_of(
        cifinder(temp_dir.path())
            .args(["results", "--filter", "TC1=codec", "--session"])
            .arg(&session_path),
    );

    assert!(stdout.contains("2 of 3 candidates"), "{stdout}");
    assert!(stdout.contains("LS-12345 volte regression"));
    assert!(stdout.contains("IMS basic call"));
    assert!(!stdout.contains("LS-23456 volte ipsec"));
    assert!(stdout.contains("Boolean filters"));
    assert!(stdout.contains("String filters"));
}

#[test]
fn test_results_top_limits_rows() {
    let (temp_dir, session_path) = session_in_temp_dir();

    let stdout = stdout_of(
        cifinder(temp_dir.path())
            .args(["results", "--top", "1", "--format", "json", "--session"])
            .arg(&session_path),
    );
    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["candidates"].as_array().unwrap().len(), 1);
    assert_eq!(json["candidates"][0]["name"], "LS-23456 volte ipsec");
}

#[test]
fn test_detail_shows_difference_tables() {
    let (temp_dir, session_path) = session_in_temp_dir();

    let stdout = stdout_of(
        cifinder(temp_dir.path())
            .args(["detail", "0", "--session"])
            .arg(&session_path),
    );

    for title in ["Matched", "Not matched", "Only in STE", "Only in CI B2B"] {
        assert!(stdout.contains(title), "missing {title}");
    }
    assert!(stdout.contains("LS-12345 volte regression"));
    assert!(stdout.contains("TC1 (Capacity)"));
    assert!(stdout.contains("customer volte"));
}

#[test]
fn test_detail_rejects_unknown_index() {
    let (temp_dir, session_path) = session_in_temp_dir();

    let output = cifinder(temp_dir.path())
        .args(["detail", "7", "--session"])
        .arg(&session_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no candidate at index 7"));
}

#[test]
fn test_checklist_offers_true_booleans_and_selectable_strings() {
    let (temp_dir, session_path) = session_in_temp_dir();

    let stdout = stdout_of(
        cifinder(temp_dir.path())
            .args(["checklist", "--format", "json", "--session"])
            .arg(&session_path),
    );
    let json: Value = serde_json::from_str(&stdout).unwrap();

    let booleans = json["boolean"]["TC1"].as_array().unwrap();
    assert!(booleans.contains(&Value::from("volte")));
    assert_eq!(json["boolean"]["TC2"], serde_json::json!([]));
    assert_eq!(json["string"]["TC1"]["codec"], "AMR");
    assert!(json["string"]["TC1"].get("server").is_none());
}

#[test]
fn test_init_writes_config_once() {
    let temp_dir = TempDir::new().unwrap();

    cifinder(temp_dir.path()).arg("init").assert().success();
    let config = read_to_string(&temp_dir.path().join(".cifinder.toml"));
    assert!(config.contains("[backend]"));

    cifinder(temp_dir.path()).arg("init").assert().failure();
    cifinder(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
