//! End-to-end runs of the drainpipe binary

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn run(config: &str, extra: &[&str]) -> Output {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", config).unwrap();

    Command::new(env!("CARGO_BIN_EXE_drainpipe"))
        .arg("--config-file")
        .arg(file.path())
        .args(["--log-file", "none", "--no-color", "-qq"])
        .args(extra)
        .output()
        .expect("failed to run drainpipe")
}

#[test]
fn test_json_summary_for_ordered_run() {
    let output = run(
        "",
        &[
            "--capacity",
            "5",
            "--producers",
            "1",
            "--consumers",
            "1",
            "--items",
            "10",
            "--think-time-ms",
            "0",
            "--processing-time-ms",
            "0",
            "--until-done",
            "--summary-format",
            "json",
        ],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(summary["producers"][0]["delivered"], 10);
    assert_eq!(summary["consumers"][0]["processed"], 10);
    let sequences: Vec<u64> = summary["consumers"][0]["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["item"]["sequence"].as_u64().unwrap())
        .collect();
    assert_eq!(sequences, (1..=10).collect::<Vec<u64>>());
    assert_eq!(summary["failures"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_text_summary_with_stop_timer() {
    let output = run(
        "[pipeline]\nthink-time-ms = 5\nprocessing-time-ms = 1\n",
        &["--stop-after-ms", "100"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pipeline summary"));
    assert!(stdout.contains("producer 7:"));
    assert!(stdout.contains("consumer 1:"));
}

#[test]
fn test_zero_capacity_is_rejected_by_cli() {
    let output = run("", &["--capacity", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_config_file_fails() {
    let output = run("consumers = 0\n", &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("consumer"));
}
