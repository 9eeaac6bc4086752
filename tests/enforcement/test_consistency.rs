// Static/dynamic consistency: a module the validator passes runs without call violations.

use serde_json::{json, Value};
use warden_core::violation::ViolationKind;
use warden_enforce::binding::{Args, Param};
use warden_enforce::{analyze, guard, Caller, CallError, FunctionError, GovernedFn};
use warden_parsers::source::SourceUnit;

use crate::common::{calc_contract, CALCULATOR};

/// Evaluates `a <op> b` for the simple expressions the contract permits.
fn eval(expr: &str) -> Result<Value, FunctionError> {
    let parts: Vec<&str> = expr.split_whitespace().collect();
    let [a, op, b] = parts.as_slice() else {
        return Err(FunctionError::new(format!("cannot evaluate `{expr}`")));
    };
    let parse = |s: &str| {
        s.parse::<f64>()
            .map_err(|e| FunctionError::new(format!("{s}: {e}")))
    };
    let (a, b) = (parse(*a)?, parse(*b)?);
    let value = match *op {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "/" => a / b,
        other => return Err(FunctionError::new(format!("unknown operator {other}"))),
    };
    Ok(json!(value))
}

#[test]
fn test_conforming_module_runs_clean() {
    let contract = calc_contract();
    let unit = SourceUnit::python(CALCULATOR);

    let report = analyze(&contract, &unit).unwrap();
    assert_eq!(report.total_count, 0);

    let calculate = guard(
        contract,
        GovernedFn::new(
            "calculate",
            vec![Param::required("calculation")],
            unit,
            |inv| eval(inv.arg("calculation").and_then(Value::as_str).unwrap_or("")),
        ),
    );
    for expr in ["1 + 2", "6 / 3", "2 * 2"] {
        let outcome = calculate.call(&Caller::Module, Args::new().arg(expr)).unwrap();
        assert!(outcome.ok(), "{expr}: {outcome:?}");
    }
}

#[test]
fn test_static_call_violation_matches_runtime() {
    let src = CALCULATOR.replace("return eval(calculation)", "return exec(calculation)");
    let contract = calc_contract();
    let unit = SourceUnit::python(src);

    let report = analyze(&contract, &unit).unwrap();
    assert_eq!(report.call_violations.len(), 1);
    assert_eq!(report.call_violations[0].subject, "exec");

    let calculate = guard(
        contract,
        GovernedFn::new(
            "calculate",
            vec![Param::required("calculation")],
            unit,
            |_| Ok(json!(0)),
        ),
    );
    match calculate.call(&Caller::Module, Args::new().arg("1 + 1")) {
        Err(CallError::Violation(v)) => {
            assert_eq!(v.kind(), ViolationKind::CallNotAllowed);
            assert_eq!(v.to_string(), "function `calculate` trying to call `exec` which is not allowed by the contract");
        }
        other => panic!("expected call violation, got {other:?}"),
    }
}

#[test]
fn test_function_failure_is_not_a_violation() {
    let calculate = guard(
        calc_contract(),
        GovernedFn::new(
            "calculate",
            vec![Param::required("calculation")],
            SourceUnit::python(CALCULATOR),
            |inv| eval(inv.arg("calculation").and_then(Value::as_str).unwrap_or("")),
        ),
    );
    match calculate.call(&Caller::Module, Args::new().arg("1 %% 2")) {
        Err(CallError::Function(e)) => assert!(e.message.contains("unknown operator")),
        other => panic!("expected function error, got {other:?}"),
    }
}
