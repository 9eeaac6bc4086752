// Tests for `warden schema`.

use std::process::Command;

use serde_json::{json, Value};

use crate::common::{calc_contract_json, create_project, warden_bin};

#[test]
/// A well-formed contract is reported valid with its declared functions.
fn test_schema_valid_contract() {
    let contract = calc_contract_json().to_string();
    let (_dir, root) = create_project(&[("calc.json", &contract)]);

    let out = Command::new(warden_bin())
        .args(["schema", "--contract", "calc.json"])
        .current_dir(&root)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("valid against schema v1 (1 function(s) declared)"),
        "got: {stdout}"
    );
}

#[test]
/// A missing per-function key is named in the error.
fn test_schema_missing_function_key() {
    let mut contract = calc_contract_json();
    contract["calculate"]
        .as_object_mut()
        .unwrap()
        .remove("allowed_callers");
    let contract = contract.to_string();
    let (_dir, root) = create_project(&[("calc.json", &contract)]);

    let out = Command::new(warden_bin())
        .args(["--json", "schema", "--contract", "calc.json"])
        .current_dir(&root)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(2));
    let result: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(result["valid"], json!(false));
    let error = result["error"].as_str().unwrap();
    assert!(error.contains("allowed_callers"), "got: {error}");
    assert!(error.contains("contract['calculate']"), "got: {error}");
}

#[test]
/// An unknown schema name is a load error, not a contract defect.
fn test_schema_unknown_version() {
    let contract = calc_contract_json().to_string();
    let (_dir, root) = create_project(&[("calc.json", &contract)]);

    let out = Command::new(warden_bin())
        .args(["schema", "--contract", "calc.json", "--schema", "v9"])
        .current_dir(&root)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown schema `v9`"), "got: {stderr}");
}

#[test]
/// A schema file on disk can replace the built-in one.
fn test_schema_from_file() {
    let schema = json!({
        "version": "strict",
        "globals": {"functions": "list", "owner": "string"},
        "functions": {"returns": "predicate"},
    })
    .to_string();
    let contract = json!({
        "functions": ["f"],
        "owner": "payments",
        "f": {"returns": "number"},
    })
    .to_string();
    let (_dir, root) = create_project(&[("strict.json", &schema), ("c.json", &contract)]);

    let out = Command::new(warden_bin())
        .args(["--json", "schema", "--contract", "c.json", "--schema", "strict.json"])
        .current_dir(&root)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0));
    let result: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(result["schema"], json!("strict.json"));
    assert_eq!(result["functions"], json!(["f"]));
}
