// The outcome envelope and violation taxonomy as seen by callers.

use serde_json::json;
use warden_core::outcome::Outcome;
use warden_core::violation::{Violation, ViolationKind};

#[test]
fn test_outcome_has_exactly_one_side() {
    let ok = Outcome::Ok(json!(0.2));
    assert!(ok.ok());
    assert_eq!(ok.value(), Some(&json!(0.2)));
    assert!(ok.violation().is_none());

    let violated = Outcome::Violated(Violation::TimeoutExceeded {
        function: "one_sec".into(),
        limit_seconds: 0.25,
    });
    assert!(!violated.ok());
    assert!(violated.value().is_none());
    assert_eq!(
        violated.violation().map(Violation::kind),
        Some(ViolationKind::TimeoutExceeded)
    );
}

#[test]
fn test_outcome_serializes_for_reporting() {
    let violated = Outcome::Violated(Violation::CallerNotAllowed {
        function: "calculate".into(),
        caller: "helper".into(),
    });
    let value = serde_json::to_value(&violated).unwrap();
    assert!(value.get("violated").is_some(), "got: {value}");
    let back: Outcome = serde_json::from_value(value).unwrap();
    assert_eq!(back, violated);
}

#[test]
fn test_null_return_is_still_a_value() {
    let ok = Outcome::Ok(json!(null));
    assert!(ok.ok());
    assert_eq!(ok.into_value(), Some(json!(null)));
}
