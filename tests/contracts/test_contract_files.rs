// Contract files as written on disk: parsing, evolution, and the rules they encode.

use serde_json::json;
use warden_core::contract::{Contract, FunctionSpec};
use warden_core::descriptor::ContractDescription;
use warden_core::predicate::Predicate;
use warden_core::schema::Schema;
use warden_core::MODULE_CALLER;

use crate::common::{calc_contract, calc_contract_json, create_project};

#[test]
fn test_contract_file_roundtrips_through_disk() {
    let content = serde_json::to_string_pretty(&calc_contract_json()).unwrap();
    let (_dir, root) = create_project(&[("contracts/calc.json", &content)]);

    let raw = std::fs::read_to_string(root.join("contracts/calc.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let contract =
        Contract::from_description(&ContractDescription::from_json(&value), &Schema::v1()).unwrap();

    assert!(contract.raise_on_violation());
    assert_eq!(contract.declared_functions(), ["calculate"]);
    let spec = contract.spec("calculate").unwrap();
    assert!(spec.allowed_callers.contains(MODULE_CALLER));
    assert_eq!(spec.returns.name(), "number");
}

#[test]
fn test_global_calls_apply_to_every_function() {
    let contract = calc_contract();
    assert!(contract.is_call_allowed("calculate", "eval"));
    assert!(contract.is_call_allowed("calculate", "enforce_contract"));
    assert!(!contract.is_call_allowed("calculate", "exec"));
    assert!(contract.is_import_allowed("sys"));
    assert!(!contract.is_import_allowed("os"));
}

#[test]
fn test_revision_leaves_original_untouched() {
    let original = calc_contract();
    let revised = original
        .revise(|draft| {
            draft.allowable_imports.insert("math".into());
            draft.declare(
                "square",
                FunctionSpec::new()
                    .param("x", Predicate::Number)
                    .returns(Predicate::Number)
                    .allow_caller("calculate"),
            );
        })
        .unwrap();

    assert!(!original.is_declared("square"));
    assert!(!original.is_import_allowed("math"));
    assert!(revised.is_declared("square"));
    assert!(revised.is_import_allowed("math"));
    assert_eq!(revised.declared_functions(), ["calculate", "square"]);
}

#[test]
fn test_attached_predicate_survives_sealing() {
    let mut desc = ContractDescription::from_json(&calc_contract_json());
    let attached = desc.set_param_predicate(
        "calculate",
        "calculation",
        Predicate::custom("short_expression", |v| {
            v.as_str().is_some_and(|s| s.len() < 16)
        }),
    );
    assert!(attached);

    let contract = Contract::from_description(&desc, &Schema::v1()).unwrap();
    let predicate = &contract.spec("calculate").unwrap().params["calculation"];
    assert_eq!(predicate.name(), "short_expression");
    assert!(predicate.test(&json!("1 + 1")));
    assert!(!predicate.test(&json!("1 + 1 + 1 + 1 + 1 + 1")));
    assert!(!predicate.test(&json!(2)));
}
