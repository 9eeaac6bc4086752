//! Contract enforcement for warden.
//!
//! Two consumers of one [`Contract`](warden_core::contract::Contract):
//! - [`guard`] wraps a function and checks every invocation at runtime: declaration,
//!   call graph, caller, parameters, time budget (in an isolated worker), return value
//! - [`validator`] reads a whole module's source and reports every static breach without
//!   executing anything
//!
//! [`binding`] maps call arguments onto declared parameters, [`worker`] runs a body in a
//! forked process under a hard deadline, and [`report`] holds the validator's output.

pub mod binding;
pub mod error;
pub mod guard;
pub mod report;
pub mod validator;
pub mod worker;

pub use error::{CallError, FunctionError, WorkerError};
pub use guard::{guard, Caller, GovernedFn, Guarded, Invocation};
pub use report::{
    CheckResult, FileFailure, FileReport, RecordKind, SchemaResult, ViolationRecord, ViolationReport,
};
pub use validator::{analyze, analyze_with, ValidatorOptions};
