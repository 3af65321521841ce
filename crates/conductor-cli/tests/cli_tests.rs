use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const TEST_CATALOG: &str = r#"[
  {"id": "checklist", "title": "Manual checklist", "tags": {"team": "ops"}, "steps": [
    {"id": "first", "title": "First check"},
    {"id": "second", "title": "Second check", "depends_on": ["first"]}
  ]}
]"#;

/// Helper function to create a Command with --no-color flag for testing
fn conductor_cmd() -> Command {
    let mut cmd = Command::cargo_bin("conductor").expect("Failed to find conductor binary");
    cmd.arg("--no-color");
    cmd
}

/// Helper function to write the test catalog into a temporary directory
fn create_catalog_file() -> (TempDir, String) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("catalog.json");
    fs::write(&path, TEST_CATALOG).expect("Failed to write catalog");
    let path = path.to_str().unwrap().to_string();
    (temp_dir, path)
}

/// Feeds `input` to `conductor serve` and returns one JSON value per output line
fn serve(catalog: &str, input: &str) -> Vec<Value> {
    let output = conductor_cmd()
        .args(["--catalog", catalog, "serve"])
        .write_stdin(input)
        .output()
        .expect("Failed to run conductor serve");
    assert!(output.status.success());

    String::from_utf8(output.stdout)
        .expect("Invalid UTF-8 in serve output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each output line is JSON"))
        .collect()
}

#[test]
fn test_cli_default_lists_sample_plans() {
    conductor_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("# Plans"))
        .stdout(predicate::str::contains("(ID: service-restart)"))
        .stdout(predicate::str::contains("(ID: incident-triage)"));
}

#[test]
fn test_cli_plan_list_with_filters() {
    conductor_cmd()
        .args(["plan", "list", "--tag", "kind=incident"])
        .assert()
        .success()
        .stdout(predicate::str::contains("incident-triage"))
        .stdout(predicate::str::contains("service-restart").not());

    conductor_cmd()
        .args(["plan", "list", "--query", "nothing matches this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_plan_show() {
    conductor_cmd()
        .args(["plan", "show", "service-restart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Rolling service restart (service-restart)"))
        .stdout(predicate::str::contains("- Depends on: restart"));
}

#[test]
fn test_cli_plan_show_unknown() {
    conductor_cmd()
        .args(["plan", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plan 'nope' not found"));
}

#[test]
fn test_cli_run_with_complete_manual() {
    conductor_cmd()
        .args([
            "--step-duration",
            "0s",
            "run",
            "service-restart",
            "--scope",
            "env=staging",
            "--complete-manual",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Run run-001: Rolling service restart"))
        .stdout(predicate::str::contains("- Status: completed"))
        .stdout(predicate::str::contains("- Scope: env=staging"))
        .stdout(predicate::str::contains("- Completed by: cli"))
        .stdout(predicate::str::contains("Success: Completed 1 manual step(s)"));
}

#[test]
fn test_cli_run_stops_at_manual_steps() {
    let (_temp_dir, catalog) = create_catalog_file();

    conductor_cmd()
        .args(["--catalog", &catalog, "run", "checklist"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Status: created"))
        .stdout(predicate::str::contains("◎ Ready"))
        .stdout(predicate::str::contains("○ Pending"));
}

#[test]
fn test_cli_invalid_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"[{"id": "bad", "title": "Bad", "steps": [
            {"id": "a", "title": "A", "depends_on": ["ghost"]}
        ]}]"#,
    )
    .unwrap();

    conductor_cmd()
        .args(["--catalog", path.to_str().unwrap(), "plan", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_serve_round_trip() {
    let (_temp_dir, catalog) = create_catalog_file();
    let input = [
        r#"{"method": "start_run", "config": {"source": "test-host"}, "payload": {"plan_id": "checklist"}}"#,
        "",
        r#"{"method": "complete_step", "payload": {"run_id": "run-001", "step_id": "first", "actor": "alice"}}"#,
        r#"{"method": "complete_step", "payload": {"run_id": "run-001", "step_id": "second", "actor": "bob", "note": "done"}}"#,
        r#"{"method": "get_run", "payload": {"id": "run-001"}}"#,
    ]
    .join("\n");

    let responses = serve(&catalog, &input);
    assert_eq!(responses.len(), 4);

    assert_eq!(responses[0]["result"]["id"], "run-001");
    assert_eq!(responses[0]["result"]["metadata"]["source"], "test-host");
    assert_eq!(responses[0]["result"]["steps"][0]["status"], "ready");
    assert_eq!(responses[1]["result"]["steps"][1]["status"], "ready");
    assert_eq!(responses[2]["result"]["status"], "completed");

    let run = &responses[3]["result"];
    assert_eq!(run["status"], "completed");
    assert_eq!(run["steps"][1]["actor"], "bob");
    assert_eq!(run["steps"][1]["note"], "done");
}

#[test]
fn test_serve_errors() {
    let (_temp_dir, catalog) = create_catalog_file();
    let input = [
        "this is not json",
        r#"{"method": "explode"}"#,
        r#"{"method": "get_plan", "payload": {"id": "missing"}}"#,
        r#"{"method": "start_run", "payload": {"plan_id": "checklist"}}"#,
        r#"{"method": "complete_step", "payload": {"run_id": "run-001", "step_id": "first"}}"#,
        r#"{"method": "complete_step", "payload": {"run_id": "run-001", "step_id": "first"}}"#,
    ]
    .join("\n");

    let responses = serve(&catalog, &input);
    let codes: Vec<&str> = responses
        .iter()
        .map(|r| r["error"]["code"].as_str().unwrap_or("ok"))
        .collect();
    assert_eq!(
        codes,
        vec![
            "invalid_request",
            "invalid_request",
            "not_found",
            "ok",
            "ok",
            "conflict"
        ]
    );
}

#[test]
fn test_serve_query_plans_by_tag() {
    let (_temp_dir, catalog) = create_catalog_file();
    let input = concat!(
        r#"{"method": "query_plans", "payload": {"tags": {"team": "ops"}}}"#,
        "\n",
        r#"{"method": "query_plans", "payload": {"tags": {"team": "dev"}}}"#,
        "\n"
    );

    let responses = serve(&catalog, input);
    assert_eq!(responses[0]["result"][0]["id"], "checklist");
    assert_eq!(responses[1]["result"], serde_json::json!([]));
}
