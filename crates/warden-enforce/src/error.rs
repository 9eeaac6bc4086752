use serde::{Deserialize, Serialize};
use warden_core::violation::Violation;
use warden_parsers::extract::ExtractError;

/// A failure raised by the governed function itself.
///
/// Never treated as a contract violation: it reaches the caller unchanged in both
/// delivery modes, and crosses the worker boundary intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct FunctionError {
    pub message: String,
}

impl FunctionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The isolated worker could not deliver a result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkerError {
    #[error("failed to create worker pipe: {0}")]
    Pipe(String),
    #[error("failed to fork worker: {0}")]
    Fork(String),
    #[error("failed to read worker result: {0}")]
    Io(String),
    #[error("worker exited without reporting a result")]
    NoReport,
    #[error("worker sent an unreadable result: {0}")]
    Decode(String),
    #[error("time-bounded execution requires a unix platform")]
    Unsupported,
}

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Raised only when the contract's `raise_on_contract_exception` is on.
    #[error(transparent)]
    Violation(#[from] Violation),
    #[error(transparent)]
    Function(#[from] FunctionError),
    #[error("cannot derive call graph: {0}")]
    Source(#[from] ExtractError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

impl CallError {
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            CallError::Violation(v) => Some(v),
            _ => None,
        }
    }
}
