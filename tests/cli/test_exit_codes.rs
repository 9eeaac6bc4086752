// Tests for CLI exit code behavior.

use std::process::Command;

use crate::common::{calc_contract_json, create_project, warden_bin, CALCULATOR};

#[test]
/// Exit code 2 when the contract file does not exist.
fn test_exit_code_2_missing_contract() {
    let (_dir, root) = create_project(&[("calculator.py", CALCULATOR)]);
    let out = Command::new(warden_bin())
        .args(["check", "--contract", "nope.json"])
        .current_dir(&root)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to read"));
}

#[test]
/// Exit code 2 when the contract fails its schema, before any file is read.
fn test_exit_code_2_invalid_contract() {
    let mut contract = calc_contract_json();
    contract["raise_on_contract_exception"] = serde_json::json!("yes");
    let contract = contract.to_string();
    let (_dir, root) = create_project(&[("calc.json", &contract), ("calculator.py", CALCULATOR)]);
    let out = Command::new(warden_bin())
        .args(["check", "--contract", "calc.json"])
        .current_dir(&root)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("raise_on_contract_exception"));
}

#[test]
/// Exit code 2 when a requested path does not exist.
fn test_exit_code_2_missing_path() {
    let contract = calc_contract_json().to_string();
    let (_dir, root) = create_project(&[("calc.json", &contract)]);
    let out = Command::new(warden_bin())
        .args(["check", "--contract", "calc.json", "missing/"])
        .current_dir(&root)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
}

#[test]
/// An unparseable file is a failure and outranks violations elsewhere.
fn test_exit_code_2_unparseable_file_wins() {
    let contract = calc_contract_json().to_string();
    let (_dir, root) = create_project(&[
        ("calc.json", &contract),
        ("broken.py", "def broken(:\n    pass\n"),
        ("extra.py", "def extra():\n    pass\n"),
    ]);
    let out = Command::new(warden_bin())
        .args(["check", "--contract", "calc.json"])
        .current_dir(&root)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("error: ") && stdout.contains("broken.py"), "got: {stdout}");
}

#[test]
/// Shell completions are generated without a contract.
fn test_completion_generates_script() {
    let out = Command::new(warden_bin())
        .args(["completion", "bash"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("warden"));
}
