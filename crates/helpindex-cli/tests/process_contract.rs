use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn cli_bin_path() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_helpindex") {
        return PathBuf::from(path);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(PathBuf::from)
        .expect("workspace root");
    let bin_name = if cfg!(windows) {
        "helpindex.exe"
    } else {
        "helpindex"
    };
    let fallback = workspace_root.join("target").join("debug").join(bin_name);
    assert!(
        fallback.exists(),
        "helpindex binary not found at {}",
        fallback.display()
    );
    fallback
}

fn write_manual(root: &Path) {
    let dir = root.join("en");
    fs::create_dir_all(&dir).expect("create manual dir");
    for (name, title, body) in [
        ("intro.html", "Introduction", "Warehouse Simulation Basics"),
        ("advanced.html", "Advanced Topics", "Warehouse Routing Algorithms"),
        ("faq.html", "FAQ", "Warehouse questions and answers"),
    ] {
        fs::write(
            dir.join(name),
            format!("<html><head><title>{title}</title></head><body>{body}</body></html>"),
        )
        .expect("write help page");
    }
}

fn run_cli(root: &Path, args: &[&str]) -> Output {
    Command::new(cli_bin_path())
        .args([
            "--root",
            root.to_str().expect("root path"),
            "--lang",
            "en=en",
            "--build-delay-ms",
            "0",
        ])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run helpindex")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

#[test]
fn titles_process_contract_returns_matching_titles() {
    // Given a three-page English manual
    // When running `helpindex titles adv`
    // Then stdout carries only the matching title -> page map.
    let root = tempdir().expect("tempdir");
    write_manual(root.path());

    let json = stdout_json(&run_cli(root.path(), &["titles", "adv"]));
    assert_eq!(json, serde_json::json!({ "Advanced Topics": "advanced.html" }));
}

#[test]
fn search_process_contract_returns_token_page_sets() {
    let root = tempdir().expect("tempdir");
    write_manual(root.path());

    let json = stdout_json(&run_cli(root.path(), &["search", "warehouse"]));
    assert_eq!(
        json,
        serde_json::json!({ "Warehouse": ["advanced.html", "faq.html", "intro.html"] })
    );
}

#[test]
fn page_and_stats_process_contract_report_index_contents() {
    let root = tempdir().expect("tempdir");
    write_manual(root.path());

    let page = stdout_json(&run_cli(root.path(), &["page", "faq.html"]));
    assert_eq!(page["title"], "FAQ");

    let missing = stdout_json(&run_cli(root.path(), &["page", "nope.html"]));
    assert!(missing["title"].is_null());

    let stats = stdout_json(&run_cli(root.path(), &["stats"]));
    assert_eq!(stats[0]["language"], "en");
    assert_eq!(stats[0]["scanned_documents"], 3);
    assert_eq!(stats[0]["pruning_limit"], 20);
}

#[test]
fn missing_language_configuration_exits_non_zero_with_error_payload() {
    // Given no manifest and no --lang flag
    // When running `helpindex stats`
    // Then process exits non-zero and stderr carries a structured error payload.
    let root = tempdir().expect("tempdir");
    let output = Command::new(cli_bin_path())
        .args(["--root", root.path().to_str().expect("root path"), "stats"])
        .env_remove("RUST_LOG")
        .output()
        .expect("run helpindex");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"code\": \"VALIDATION_FAILED\""), "stderr: {stderr}");
    assert!(stderr.contains("\"operation\": \"stats\""), "stderr: {stderr}");
}

#[test]
fn timed_out_build_answers_empty_and_logs_lifecycle_state() {
    // Given a build delayed far beyond the wait timeout
    // When running `helpindex titles adv`
    // Then stdout carries the empty not-ready answer and stderr names the state.
    let root = tempdir().expect("tempdir");
    write_manual(root.path());

    let output = Command::new(cli_bin_path())
        .args([
            "--root",
            root.path().to_str().expect("root path"),
            "--lang",
            "en=en",
            "--build-delay-ms",
            "60000",
            "--timeout-ms",
            "50",
            "titles",
            "adv",
        ])
        .env_remove("RUST_LOG")
        .output()
        .expect("run helpindex");

    let json = stdout_json(&output);
    assert_eq!(json, serde_json::json!({}));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not ready in time"), "stderr: {stderr}");
    assert!(stderr.contains("building"), "stderr: {stderr}");
}
