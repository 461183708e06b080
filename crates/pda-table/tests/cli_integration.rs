//! Integration tests for the pda-fuzz CLI.

use clap as _;
use env_logger as _;
use log as _;
use pda_core as _;
use pda_table as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror as _;

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pda-fuzz"))
}

fn table_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tables").join(name)
}

fn create_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run pda-fuzz")
}

#[test]
fn fuzz_prints_accepted_words_in_enumeration_order() {
    let table = table_path("balanced.pda");
    let output = run(&["fuzz", table.to_str().unwrap(), "--max-len", "4"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "\n()\n()()\n(())\n");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exhausted: 31 words tested, 4 accepted"));
}

#[test]
fn fuzz_reads_literate_tables() {
    let table = table_path("anbn.pda.md");
    let output = run(&["fuzz", table.to_str().unwrap(), "--max-len", "6"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "\nab\naabb\naaabbb\n"
    );
}

#[test]
fn fuzz_reports_timeout_when_budget_runs_out() {
    let table = table_path("balanced.pda");
    let output = run(&[
        "fuzz",
        table.to_str().unwrap(),
        "--max-len",
        "150",
        "--budget-ms",
        "50",
    ]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("timeout:"));
    assert!(!stderr.contains("exhausted:"));
}

#[test]
fn check_prints_one_verdict_per_word() {
    let table = table_path("balanced.pda");
    let output = run(&["check", table.to_str().unwrap(), "", "()", "(()", ")("]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "accept\naccept\nreject\nreject\n"
    );
}

#[test]
fn check_reports_inconclusive_epsilon_loops() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(
        temp_dir.path(),
        "loop.pda",
        "0, Z\na, 1/Z\n\n*1, Z\n, /Z\n",
    );

    let output = run(&[
        "check",
        source.to_str().unwrap(),
        "a",
        "aa",
        "--epsilon-limit",
        "8",
    ]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "accept\ninconclusive\n"
    );
}

#[test]
fn check_allows_epsilon_chains_as_long_as_the_limit() {
    let table = table_path("balanced.pda");
    let output = run(&[
        "check",
        table.to_str().unwrap(),
        "()()",
        "--epsilon-limit",
        "1",
    ]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "accept\n");
}

#[test]
fn alphabet_prints_symbols_in_canonical_order() {
    let table = table_path("anbn.pda.md");
    let output = run(&["alphabet", table.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "a\nb\n");
}

#[test]
fn parse_errors_report_location_and_fail() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "bad.pda", "0, Z\na, 1Z\n");

    let output = run(&["check", source.to_str().unwrap(), "a"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.pda:2:4: error: entry missing '/': 1Z"));
}

#[test]
fn non_deterministic_tables_fail() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(temp_dir.path(), "nd.pda", "0, Z\na, 0/Z\n, 1/Z\n");

    let output = run(&["fuzz", source.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: non-deterministic"));
}

#[test]
fn missing_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("absent.pda");

    let output = run(&["alphabet", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}

#[test]
fn verbose_flag_enables_debug_logging() {
    let table = table_path("balanced.pda");
    let output = run(&["-v", "alphabet", table.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("parsed table for state 0"));
}
