//! CLI binary integration tests using assert_cmd + predicates.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("jsonsubschema").expect("binary should exist")
}

fn write_schema(dir: &TempDir, name: &str, schema: &serde_json::Value) -> String {
    let path = dir.path().join(name);
    fs::write(&path, schema.to_string()).unwrap();
    path.to_str().unwrap().to_string()
}

// ── Exit 0: true ─────────────────────────────────────────────────────────

#[test]
fn test_subschema_true_prints_true_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let left = write_schema(
        &dir,
        "left.json",
        &serde_json::json!({"type": "integer", "minimum": 0, "maximum": 10}),
    );
    let right = write_schema(&dir, "right.json", &serde_json::json!({"type": "number"}));

    cmd()
        .args([&left, &right])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));
}

// ── Exit 0: false ────────────────────────────────────────────────────────

#[test]
fn test_subschema_false_prints_false_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let left = write_schema(&dir, "left.json", &serde_json::json!({"type": "string"}));
    let right = write_schema(&dir, "right.json", &serde_json::json!({"type": "integer"}));

    cmd()
        .args([&left, &right])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

// ── Exit 2: invalid input schema ────────────────────────────────────────

#[test]
fn test_metaschema_rejection_exits_two() {
    let dir = TempDir::new().unwrap();
    let left = write_schema(&dir, "left.json", &serde_json::json!({"type": "not-a-real-type"}));
    let right = write_schema(&dir, "right.json", &serde_json::json!({"type": "string"}));

    cmd()
        .args([&left, &right])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("metaschema"));
}

// ── Exit 3: unsupported construct ───────────────────────────────────────

#[test]
fn test_one_of_on_left_exits_three() {
    let dir = TempDir::new().unwrap();
    let left = write_schema(
        &dir,
        "left.json",
        &serde_json::json!({"oneOf": [{"type": "string"}, {"type": "integer"}]}),
    );
    let right = write_schema(&dir, "right.json", &serde_json::json!({"type": "string"}));

    cmd().args([&left, &right]).assert().failure().code(3);
}

// ── Exit 1: I/O / parse error ────────────────────────────────────────────

#[test]
fn test_missing_file_exits_one() {
    let dir = TempDir::new().unwrap();
    let right = write_schema(&dir, "right.json", &serde_json::json!({"type": "string"}));
    let missing = dir.path().join("does-not-exist.json");

    cmd()
        .args([missing.to_str().unwrap(), &right])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_malformed_json_exits_one() {
    let dir = TempDir::new().unwrap();
    let left = dir.path().join("malformed.json");
    fs::write(&left, "this is not valid JSON {{{").unwrap();
    let right = write_schema(&dir, "right.json", &serde_json::json!({"type": "string"}));

    cmd()
        .args([left.to_str().unwrap(), &right])
        .assert()
        .failure()
        .code(1);
}

// ── Verbose flag ─────────────────────────────────────────────────────────

#[test]
fn test_verbose_flag_is_accepted() {
    let dir = TempDir::new().unwrap();
    let left = write_schema(&dir, "left.json", &serde_json::json!({"type": "boolean"}));
    let right = write_schema(&dir, "right.json", &serde_json::json!({"type": "boolean"}));

    cmd().args(["-v", &left, &right]).assert().success();
}
