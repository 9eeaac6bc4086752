/// Shared test helpers for all warden integration tests.
///
/// Import from any integration test file with:
///   `#[path = "common/mod.rs"] mod common;`
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use serde_json::{json, Value};
use tempfile::TempDir;
use warden_core::contract::Contract;
use warden_core::descriptor::ContractDescription;
use warden_core::schema::Schema;

/// The calculator module: one governed function, a `__main__` block, three imports.
#[allow(dead_code)]
pub const CALCULATOR: &str = r#"from contract_util import *
from calc_contract import c as contract
from sys import argv


@enforce_contract(contract)
def calculate(calculation):
    return eval(calculation)


if __name__ == "__main__":
    if len(argv) > 1:
        val = calculate("".join(argv[1:]))
        print(val)
"#;

/// Contract file for [`CALCULATOR`].
#[allow(dead_code)]
pub fn calc_contract_json() -> Value {
    json!({
        "raise_on_contract_exception": true,
        "functions": ["calculate"],
        "calculate": {
            "params": {"calculation": "string"},
            "returns": "number",
            "allowable_calls": ["eval"],
            "max_runtime_seconds": 2.0,
            "allowed_callers": ["<module>"],
        },
        "allowable_imports": ["sys", "contract_util", "calc_contract"],
        "global_allowed_calls": ["enforce_contract"],
    })
}

#[allow(dead_code)]
pub fn calc_contract() -> Contract {
    let desc = ContractDescription::from_json(&calc_contract_json());
    Contract::from_description(&desc, &Schema::v1()).unwrap()
}

/// Create a project directory from a set of files.
///
/// Each entry in `files` is `(relative_path, content)`.
/// Returns (TempDir, project_root). Hold the TempDir to keep the directory alive.
#[allow(dead_code)]
pub fn create_project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    let project_root = root.to_path_buf();
    (dir, project_root)
}

/// Get path to compiled warden binary.
///
/// Builds the binary if it doesn't exist yet.
#[allow(dead_code)]
pub fn warden_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove 'deps'
    path.push("warden");
    if path.exists() {
        return path;
    }
    let workspace = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let status = Command::new("cargo")
        .args(["build", "-p", "warden-cli"])
        .current_dir(&workspace)
        .status()
        .expect("Failed to build warden");
    assert!(status.success(), "Failed to build warden binary");
    path
}
