// Tests for time-bounded isolated execution through the guard.

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use warden_core::contract::Contract;
use warden_core::descriptor::ContractDescription;
use warden_core::outcome::Outcome;
use warden_core::predicate::Predicate;
use warden_core::schema::Schema;
use warden_core::violation::Violation;
use warden_enforce::binding::{Args, Param};
use warden_enforce::{guard, Caller, CallError, GovernedFn, Guarded};
use warden_parsers::source::SourceUnit;

const ONE_SEC: &str = r#"
from contract_util import enforce_contract
from time import sleep


@enforce_contract(c)
def one_sec(stime):
    sleep(stime)
    return stime
"#;

fn one_sec_contract(raise: bool) -> Contract {
    let mut desc = ContractDescription::from_json(&json!({
        "raise_on_contract_exception": raise,
        "functions": ["one_sec"],
        "one_sec": {
            "params": {"stime": "any"},
            "returns": "not_none",
            "allowable_calls": ["sleep"],
            "max_runtime_seconds": 0.25,
            "allowed_callers": ["test_time"],
        },
        "allowable_imports": ["contract_util", "time"],
        "global_allowed_calls": ["enforce_contract"],
    }));
    assert!(desc.set_param_predicate(
        "one_sec",
        "stime",
        Predicate::custom("seconds", |v| v.as_f64().is_some_and(|s| s >= 0.0)),
    ));
    Contract::from_description(&desc, &Schema::v1()).unwrap()
}

fn one_sec(raise: bool) -> Guarded {
    guard(
        one_sec_contract(raise),
        GovernedFn::new(
            "one_sec",
            vec![Param::required("stime")],
            SourceUnit::python(ONE_SEC),
            |inv| {
                let stime = inv.arg("stime").and_then(Value::as_f64).unwrap_or(0.0);
                std::thread::sleep(Duration::from_secs_f64(stime));
                Ok(json!(stime))
            },
        ),
    )
}

#[test]
/// A run shorter than the budget returns the true result.
fn test_under_budget_returns_value() {
    let outcome = one_sec(true)
        .call(&Caller::function("test_time"), Args::new().arg(0.2))
        .unwrap();
    assert!(outcome.ok());
    assert_eq!(outcome.value(), Some(&json!(0.2)));
}

#[test]
/// A run longer than the budget is killed and reported, never partially returned.
fn test_over_budget_is_killed() {
    let err = one_sec(true)
        .call(&Caller::function("test_time"), Args::new().arg(0.3))
        .unwrap_err();
    match err {
        CallError::Violation(Violation::TimeoutExceeded {
            function,
            limit_seconds,
        }) => {
            assert_eq!(function, "one_sec");
            assert_eq!(limit_seconds, 0.25);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
/// The worker is killed at the deadline rather than waited for.
fn test_long_run_is_cut_short() {
    let start = Instant::now();
    let result = one_sec(true).call(&Caller::function("test_time"), Args::new().arg(10.0));
    assert!(result.is_err());
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[test]
/// With raising disabled the timeout arrives wrapped in the outcome.
fn test_over_budget_wrapped() {
    let outcome = one_sec(false)
        .call(&Caller::function("test_time"), Args::new().arg(0.3))
        .unwrap();
    assert!(!outcome.ok());
    assert!(outcome.value().is_none());
    assert!(matches!(
        outcome,
        Outcome::Violated(Violation::TimeoutExceeded { .. })
    ));
}

#[test]
/// The caller check still runs before the worker is spawned.
fn test_wrong_caller_never_runs() {
    let start = Instant::now();
    let outcome = one_sec(false)
        .call(&Caller::Module, Args::new().arg(5.0))
        .unwrap();
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(
        outcome.violation(),
        Some(&Violation::CallerNotAllowed {
            function: "one_sec".into(),
            caller: "<module>".into()
        })
    );
}

#[test]
/// A budget too large to represent as a deadline still runs the body to completion.
fn test_oversized_budget_runs_to_completion() {
    let contract = one_sec_contract(true)
        .revise(|draft| {
            if let Some(spec) = draft.spec_mut("one_sec") {
                spec.max_runtime_seconds = 1e20;
            }
        })
        .unwrap();
    let outcome = one_sec(true)
        .rebind(contract)
        .call(&Caller::function("test_time"), Args::new().arg(0.05))
        .unwrap();
    assert_eq!(outcome.value(), Some(&json!(0.05)));
}

#[test]
/// Timed calls from several threads each see their own result.
fn test_concurrent_timed_calls() {
    let guarded = one_sec(true);
    let handles: Vec<_> = (0..6)
        .map(|i| {
            let guarded = guarded.clone();
            std::thread::spawn(move || {
                let stime = if i % 2 == 0 { 0.0 } else { 0.15 };
                for _ in 0..10 {
                    let outcome = guarded
                        .call(&Caller::function("test_time"), Args::new().arg(stime))
                        .unwrap();
                    assert_eq!(outcome.value(), Some(&json!(stime)));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
