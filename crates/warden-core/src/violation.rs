//! Contract violations.
//!
//! [`Violation`] is what the runtime guard detects on a single invocation. It crosses
//! the `raise_on_contract_exception` switch unchanged: raised as an error or wrapped in an
//! [`Outcome`](crate::outcome::Outcome). [`ViolationKind`] names every kind in the
//! taxonomy, including the ones only the static validator reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every kind of contract breach warden can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    SchemaInvalid,
    FunctionNotDeclared,
    CallNotAllowed,
    ImportNotAllowed,
    CallerNotAllowed,
    UnboundParameters,
    ParamNotDeclared,
    ParamInvalid,
    ReturnInvalid,
    TimeoutExceeded,
    UndeclaredFunction,
    UndefinedFunction,
    UndecoratedClass,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::SchemaInvalid => "schema_invalid",
            ViolationKind::FunctionNotDeclared => "function_not_declared",
            ViolationKind::CallNotAllowed => "call_not_allowed",
            ViolationKind::ImportNotAllowed => "import_not_allowed",
            ViolationKind::CallerNotAllowed => "caller_not_allowed",
            ViolationKind::UnboundParameters => "unbound_parameters",
            ViolationKind::ParamNotDeclared => "param_not_declared",
            ViolationKind::ParamInvalid => "param_invalid",
            ViolationKind::ReturnInvalid => "return_invalid",
            ViolationKind::TimeoutExceeded => "timeout_exceeded",
            ViolationKind::UndeclaredFunction => "undeclared_function",
            ViolationKind::UndefinedFunction => "undefined_function",
            ViolationKind::UndecoratedClass => "undecorated_class",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A breach detected while guarding one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("function `{function}` not declared in contract")]
    FunctionNotDeclared { function: String },
    #[error("function `{function}` trying to call `{call}` which is not allowed by the contract")]
    CallNotAllowed { function: String, call: String },
    #[error("caller `{caller}` not allowed to call this function (`{function}`)")]
    CallerNotAllowed { function: String, caller: String },
    #[error("unable to bind passed-in parameters for `{function}`: {reason}")]
    UnboundParameters { function: String, reason: String },
    #[error("parameter `{param}` used but not defined in contract for `{function}`")]
    ParamNotDeclared { function: String, param: String },
    #[error("parameter `{param}` of `{function}` out of contract specification (expected {expected})")]
    ParamInvalid {
        function: String,
        param: String,
        expected: String,
    },
    #[error("return value `{value}` of `{function}` does not match contract (expected {expected})")]
    ReturnInvalid {
        function: String,
        value: String,
        expected: String,
    },
    #[error("function `{function}` terminated due to time constraint violation ({limit_seconds}s)")]
    TimeoutExceeded { function: String, limit_seconds: f64 },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::FunctionNotDeclared { .. } => ViolationKind::FunctionNotDeclared,
            Violation::CallNotAllowed { .. } => ViolationKind::CallNotAllowed,
            Violation::CallerNotAllowed { .. } => ViolationKind::CallerNotAllowed,
            Violation::UnboundParameters { .. } => ViolationKind::UnboundParameters,
            Violation::ParamNotDeclared { .. } => ViolationKind::ParamNotDeclared,
            Violation::ParamInvalid { .. } => ViolationKind::ParamInvalid,
            Violation::ReturnInvalid { .. } => ViolationKind::ReturnInvalid,
            Violation::TimeoutExceeded { .. } => ViolationKind::TimeoutExceeded,
        }
    }

    /// Name of the governed function the violation was detected on.
    pub fn function(&self) -> &str {
        match self {
            Violation::FunctionNotDeclared { function }
            | Violation::CallNotAllowed { function, .. }
            | Violation::CallerNotAllowed { function, .. }
            | Violation::UnboundParameters { function, .. }
            | Violation::ParamNotDeclared { function, .. }
            | Violation::ParamInvalid { function, .. }
            | Violation::ReturnInvalid { function, .. }
            | Violation::TimeoutExceeded { function, .. } => function,
        }
    }
}
