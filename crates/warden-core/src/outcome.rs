use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::violation::Violation;

/// Result envelope of a guarded call.
///
/// Exactly one side is populated: the function's return value when the call honoured
/// the contract, or the violation that stopped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok(Value),
    Violated(Violation),
}

impl Outcome {
    pub fn ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// The returned value, when the call succeeded.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Ok(v) => Some(v),
            Outcome::Violated(_) => None,
        }
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Violated(v) => Some(v),
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Ok(v) => Some(v),
            Outcome::Violated(_) => None,
        }
    }
}
