//! CLI integration tests for the response-eval binary.
//!
//! Tests exercise the `response-eval` CLI through `std::process::Command`,
//! covering command routing, input errors, output files and exit codes.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// =============================================================================
// Helper Functions
// =============================================================================

const RESPONSE: &str = "First, check the service status with systemctl. Then review the logs \
with grep for errors, because the failure may be recorded there. Finally, verify the fix \
and keep a backup of the configuration before restarting the service.";

fn eval_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_response-eval"))
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(eval_bin())
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute response-eval binary")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Expected exit code 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn assert_failure(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(1),
        "Expected exit code 1, got {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// score
// =============================================================================

#[test]
fn score_text_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["score", "--text", RESPONSE, "--category", "linux"]);
    assert_success(&output);

    let result: serde_json::Value = serde_json::from_str(&stdout_str(&output)).unwrap();
    assert_eq!(result["profile"], "procedural");
    assert_eq!(result["task_type"], "procedural");
    let overall = result["overall_score"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&overall));
    let entropy = &result["signals"]["entropy"];
    assert!(entropy["token_entropy"].as_f64().unwrap() > 0.0);
    assert!(entropy["entropy_quality_ratio"].is_number());
    assert_eq!(entropy["patterns"]["has_repetitive_patterns"], false);
}

#[test]
fn score_file_compact() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "response.txt", RESPONSE);
    let output = run_in(
        dir.path(),
        &["score", "--file", file.to_str().unwrap(), "--compact"],
    );
    assert_success(&output);
    assert_eq!(stdout_str(&output).trim().lines().count(), 1);
}

#[test]
fn score_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["score", "--file", "does-not-exist.txt"]);
    assert_failure(&output);
    assert!(!output.stderr.is_empty());
}

#[test]
fn score_requires_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["score"]);
    assert!(!output.status.success());
}

// =============================================================================
// evaluate
// =============================================================================

#[test]
fn evaluate_batch_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let jobs = serde_json::json!([
        {"id": "a", "text": RESPONSE, "category": "linux"},
        {"id": "b", "text": "The answer is probably yes, because the data shows growth."},
        {"id": "c", "text": ""}
    ]);
    let input = write(dir.path(), "jobs.json", &jobs.to_string());
    let summary_path = dir.path().join("out").join("summary.json");

    let output = run_in(
        dir.path(),
        &[
            "evaluate",
            "--input",
            input.to_str().unwrap(),
            "--parallel",
            "2",
            "--output",
            summary_path.to_str().unwrap(),
        ],
    );
    assert_success(&output);
    assert!(stdout_str(&output).contains("Response Evaluation Results"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["total_jobs"], 3);
    assert_eq!(summary["completed"], 3);
    assert_eq!(summary["summary"]["count"], 3);
}

#[test]
fn evaluate_rejects_empty_job_list() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "jobs.json", "[]");
    let output = run_in(dir.path(), &["evaluate", "--input", input.to_str().unwrap()]);
    assert_failure(&output);
}

// =============================================================================
// ensemble, consensus and drift
// =============================================================================

#[test]
fn ensemble_saves_results_and_records_history() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "response.txt", RESPONSE);
    let ensemble_path = dir.path().join("ensemble.json");
    let history_path = dir.path().join("history.json");

    for _ in 0..2 {
        let output = run_in(
            dir.path(),
            &[
                "ensemble",
                "--file",
                file.to_str().unwrap(),
                "--category",
                "linux",
                "--output",
                ensemble_path.to_str().unwrap(),
                "--record",
                history_path.to_str().unwrap(),
            ],
        );
        assert_success(&output);
        assert!(stdout_str(&output).contains("Ensemble Consensus"));
    }

    let history: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&history_path).unwrap()).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);

    let output = run_in(
        dir.path(),
        &["consensus", "--input", ensemble_path.to_str().unwrap()],
    );
    assert_success(&output);
    assert!(stdout_str(&output).contains("Disagreement:"));
}

#[test]
fn consensus_rejects_duplicate_strategies() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "response.txt", RESPONSE);
    let ensemble_path = dir.path().join("ensemble.json");
    assert_success(&run_in(
        dir.path(),
        &[
            "ensemble",
            "--file",
            file.to_str().unwrap(),
            "--output",
            ensemble_path.to_str().unwrap(),
        ],
    ));

    let mut entries: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&ensemble_path).unwrap()).unwrap();
    let duplicate = entries[0].clone();
    entries.push(duplicate);
    std::fs::write(&ensemble_path, serde_json::to_string(&entries).unwrap()).unwrap();

    let output = run_in(
        dir.path(),
        &["consensus", "--input", ensemble_path.to_str().unwrap()],
    );
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Duplicate strategy"));
}

#[test]
fn drift_detects_inflation() {
    let dir = tempfile::tempdir().unwrap();
    let points: Vec<serde_json::Value> = (0..10)
        .map(|i| {
            serde_json::json!({
                "timestamp": format!("2026-02-{:02}T00:00:00Z", i + 1),
                "score": 70.0 + i as f64,
            })
        })
        .collect();
    let input = write(dir.path(), "history.json", &serde_json::to_string(&points).unwrap());

    let output = run_in(dir.path(), &["drift", "--input", input.to_str().unwrap()]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("systematic_inflation"));
}

#[test]
fn drift_rejects_unordered_history() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "history.json",
        r#"[{"timestamp": "2026-02-02T00:00:00Z", "score": 70},
            {"timestamp": "2026-02-01T00:00:00Z", "score": 71}]"#,
    );
    let output = run_in(dir.path(), &["drift", "--input", input.to_str().unwrap()]);
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("strictly increasing"));
}

// =============================================================================
// configuration
// =============================================================================

#[test]
fn init_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["init-config"]);
    assert_success(&output);

    let config_path = dir.path().join("config").join("eval.toml");
    assert!(config_path.exists());

    // the generated file is picked up by default and also accepted explicitly
    assert_success(&run_in(dir.path(), &["profiles"]));
    let output = run_in(
        dir.path(),
        &["--config", config_path.to_str().unwrap(), "profiles"],
    );
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("procedural"));
    assert!(stdout.contains("general | general (default)"));
}

#[test]
fn malformed_default_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    write(
        dir.path(),
        "config/eval.toml",
        "[profiles.general.weights]\ntechnical_accuracy = \"0.5\"\n",
    );

    let output = run_in(dir.path(), &["profiles"]);
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config/eval.toml"), "stderr: {}", stderr);
}

#[test]
fn invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "bad.toml",
        "default_profile = \"missing\"\n",
    );
    let output = run_in(
        dir.path(),
        &["--config", config.to_str().unwrap(), "score", "--text", "hello"],
    );
    assert_failure(&output);
}
