//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `typebridge` binary and verify
//! exit codes, stdout content, and stderr content.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper: create a Command for the `typebridge` binary with logging silenced.
fn typebridge() -> Command {
    let mut cmd = cargo_bin_cmd!("typebridge");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(args: &[&str]) -> serde_json::Value {
    let out = typebridge().args(args).output().unwrap();
    assert!(out.status.success(), "{:?} failed", args);
    serde_json::from_slice(&out.stdout).unwrap()
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    typebridge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Column type conversion"));
}

#[test]
fn version_exits_0() {
    typebridge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("typebridge"));
}

#[test]
fn missing_subcommand_fails() {
    typebridge().assert().failure();
}

// ──────────────────────────────────────────────
// 2. Forward conversions
// ──────────────────────────────────────────────

#[test]
fn to_target_prints_warehouse_type() {
    typebridge()
        .args(["to-target", "DECIMAL(18,3)"])
        .assert()
        .success()
        .stdout("NUMBER(18,3)\n");
}

#[test]
fn to_target_flattens_nested_types() {
    typebridge()
        .args(["to-target", "STRUCT(name VARCHAR, age INTEGER)"])
        .assert()
        .success()
        .stdout("OBJECT\n");
    typebridge()
        .args(["to-target", "INTEGER[][]"])
        .assert()
        .success()
        .stdout("ARRAY\n");
}

#[test]
fn to_target_clamps_wide_decimal_with_warning() {
    typebridge()
        .args(["to-target", "DECIMAL(40,10)"])
        .assert()
        .success()
        .stdout("NUMBER(38,8)\n")
        .stderr(predicate::str::contains("Precision reduced from 40 to 38"));
}

#[test]
fn to_interchange_prints_interchange_name() {
    typebridge()
        .args(["to-interchange", "TIMESTAMP WITH TIME ZONE"])
        .assert()
        .success()
        .stdout("timestamp[us, UTC]\n");
}

#[test]
fn to_interchange_rejects_nested() {
    typebridge()
        .args(["to-interchange", "UNION(INTEGER, VARCHAR)"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unsupported source type"));
}

#[test]
fn interchange_to_target_parses_decimal_pattern() {
    typebridge()
        .args(["interchange-to-target", "decimal128(10, 2)"])
        .assert()
        .success()
        .stdout("NUMBER(10,2)\n");
}

// ──────────────────────────────────────────────
// 3. Reverse conversions
// ──────────────────────────────────────────────

#[test]
fn to_source_reads_number_params() {
    typebridge()
        .args(["to-source", "NUMBER(7)"])
        .assert()
        .success()
        .stdout("DECIMAL(7,0)\n");
}

#[test]
fn to_source_nested_keyword_json_shows_defaults() {
    let v = stdout_json(&["to-source", "OBJECT", "--output", "json"]);
    assert_eq!(v["target"], "OBJECT");
    assert_eq!(v["source"], "STRUCT()");
    assert_eq!(v["descriptor"], serde_json::json!({ "struct": [] }));
}

#[test]
fn to_source_malformed_params_exit_1() {
    typebridge()
        .args(["to-source", "NUMBER(abc,0)"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Malformed parameter list"));
}

#[test]
fn to_source_unknown_type_json_error() {
    let out = typebridge()
        .args(["to-source", "INVALID_TYPE", "--output", "json"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(v["kind"], "UnsupportedTargetType");
    assert_eq!(v["message"], "Unsupported target type: INVALID_TYPE");
}

#[test]
fn interchange_to_source_reads_unsigned() {
    typebridge()
        .args(["interchange-to-source", "uint16"])
        .assert()
        .success()
        .stdout("USMALLINT\n");
}

// ──────────────────────────────────────────────
// 4. Decimal policy and configuration
// ──────────────────────────────────────────────

#[test]
fn adjust_decimal_reports_pinned_result() {
    typebridge()
        .args(["adjust-decimal", "45", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DECIMAL(45,5) -> DECIMAL(38,0)"));
}

#[test]
fn reject_flag_turns_clamp_into_error() {
    typebridge()
        .args(["to-target", "DECIMAL(45,5)", "--decimal-overflow", "reject"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Decimal precision exceeds target limit"));
}

#[test]
fn config_file_sets_reject_policy() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("typebridge.toml");
    fs::write(&path, "decimal_overflow = \"reject\"\n").unwrap();

    typebridge()
        .args(["to-interchange", "DECIMAL(45,5)", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("interchange limit"));

    // The flag wins over the file.
    typebridge()
        .args(["to-interchange", "DECIMAL(45,5)", "--decimal-overflow", "adjust", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout("decimal128(38,0)\n");
}

#[test]
fn unreadable_config_exits_1() {
    typebridge()
        .args(["to-target", "INTEGER", "--config", "nonexistent.toml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn quiet_suppresses_error_text() {
    typebridge()
        .args(["to-source", "INVALID_TYPE", "--quiet"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 5. Introspection
// ──────────────────────────────────────────────

#[test]
fn info_json_carries_mapping_fields() {
    let v = stdout_json(&["info", "UBIGINT", "--output", "json"]);
    assert_eq!(v["source_type_name"], "UBIGINT");
    assert_eq!(v["interchange_type_name"], "uint64");
    assert_eq!(v["target_type_name"], "NUMBER(20,0)");
    assert_eq!(v["has_precision_loss"], true);
    assert_eq!(v["requires_special_handling"], false);
}

#[test]
fn check_accepts_widening() {
    typebridge()
        .args(["check", "INTEGER", "BIGINT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fits in"));
}

#[test]
fn validate_range_rejects_narrowing() {
    typebridge()
        .args(["validate-range", "BIGINT", "SMALLINT"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("narrowing integer conversion"));
}

#[test]
fn flatten_describes_strategy() {
    typebridge()
        .args(["flatten", "MAP(VARCHAR, DOUBLE)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MAP(VARCHAR, DOUBLE) -> MAP:"))
        .stdout(predicate::str::contains("reads back as MAP(VARCHAR, VARCHAR)"));
}

#[test]
fn malformed_source_descriptor_exits_1() {
    typebridge()
        .args(["to-target", "DECIMAL(10"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Malformed source type"));
}

#[test]
fn deeply_nested_descriptor_exits_1() {
    let deep = format!("INTEGER{}", "[]".repeat(20_000));
    typebridge()
        .args(["to-target", &deep, "--quiet"])
        .assert()
        .failure()
        .code(1);

    let deep = format!("{}INTEGER{}", "LIST(".repeat(20_000), ")".repeat(20_000));
    typebridge()
        .args(["to-target", &deep, "--output", "json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("MalformedSourceType"));
}

#[test]
fn to_source_clamps_wide_number_by_default() {
    typebridge()
        .args(["to-source", "NUMBER(40,10)"])
        .assert()
        .success()
        .stdout("DECIMAL(38,8)\n");
    typebridge()
        .args(["interchange-to-target", "decimal128(40,10)", "--decimal-overflow", "reject"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("interchange limit"));
}
