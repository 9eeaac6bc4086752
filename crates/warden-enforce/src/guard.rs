//! The runtime guard.
//!
//! [`guard`] binds a governed function to a contract. Every [`Guarded::call`] runs the
//! checks in a fixed order and stops at the first failure:
//!
//! 1. the function is declared
//! 2. every name its body calls is allowed
//! 3. the caller is allowed
//! 4. the arguments bind to the declared parameters
//! 5. every bound parameter is named in the contract
//! 6. every bound value satisfies its predicate
//! 7. the body runs, in an isolated worker when a time budget is set
//! 8. the return value satisfies its predicate
//!
//! Steps 2 and 3 are repeated on every call. Edited source is re-extracted because the
//! call-graph cache is keyed by a hash of the source text.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use warden_core::contract::{Contract, FunctionSpec};
use warden_core::outcome::Outcome;
use warden_core::violation::Violation;
use warden_core::MODULE_CALLER;
use warden_parsers::cache::CallGraphCache;
use warden_parsers::source::SourceUnit;

use crate::binding::{bind, Args, BoundArgs, Param};
use crate::error::{CallError, FunctionError};
use crate::worker::{run_isolated, Timed};

type Body = dyn Fn(&Invocation<'_>) -> Result<Value, FunctionError> + Send + Sync;

/// Who is invoking a governed function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Caller {
    /// Top-level code, identified as `<module>`.
    Module,
    Function(String),
}

impl Caller {
    pub fn function(name: impl Into<String>) -> Self {
        Caller::Function(name.into())
    }

    /// The identifier matched against `allowed_callers`.
    pub fn identifier(&self) -> &str {
        match self {
            Caller::Module => MODULE_CALLER,
            Caller::Function(name) => name,
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// A function placed under contract: its name, parameters, source, and body.
#[derive(Clone)]
pub struct GovernedFn {
    name: String,
    params: Vec<Param>,
    source: SourceUnit,
    body: Arc<Body>,
}

impl GovernedFn {
    pub fn new<F>(name: impl Into<String>, params: Vec<Param>, source: SourceUnit, body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            source,
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn source(&self) -> &SourceUnit {
        &self.source
    }
}

impl fmt::Debug for GovernedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GovernedFn")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("language", &self.source.language)
            .finish_non_exhaustive()
    }
}

/// What a governed body sees while it runs.
pub struct Invocation<'a> {
    function: &'a str,
    args: &'a BoundArgs,
}

impl<'a> Invocation<'a> {
    pub fn function(&self) -> &str {
        self.function
    }

    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    pub fn args(&self) -> &BoundArgs {
        self.args
    }

    /// The identity to pass when this body calls another governed function.
    pub fn caller(&self) -> Caller {
        Caller::Function(self.function.to_string())
    }
}

/// A governed function bound to a contract snapshot.
#[derive(Debug, Clone)]
pub struct Guarded {
    contract: Arc<Contract>,
    function: GovernedFn,
    graphs: Arc<CallGraphCache>,
}

pub fn guard(contract: impl Into<Arc<Contract>>, function: GovernedFn) -> Guarded {
    Guarded {
        contract: contract.into(),
        function,
        graphs: Arc::new(CallGraphCache::new()),
    }
}

impl Guarded {
    /// Share a call-graph cache with other guards.
    pub fn with_cache(mut self, graphs: Arc<CallGraphCache>) -> Self {
        self.graphs = graphs;
        self
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn function(&self) -> &GovernedFn {
        &self.function
    }

    /// The same function under an evolved contract. The cache is shared.
    pub fn rebind(&self, contract: impl Into<Arc<Contract>>) -> Guarded {
        Guarded {
            contract: contract.into(),
            function: self.function.clone(),
            graphs: Arc::clone(&self.graphs),
        }
    }

    /// Invoke the function under the contract.
    ///
    /// Violations become `Err(CallError::Violation)` when the contract raises, and
    /// `Ok(Outcome::Violated)` otherwise. Every other error is returned as is.
    pub fn call(&self, caller: &Caller, args: Args) -> Result<Outcome, CallError> {
        match self.enforce(caller, &args) {
            Ok(value) => Ok(Outcome::Ok(value)),
            Err(CallError::Violation(violation)) => {
                tracing::warn!(
                    function = %self.function.name,
                    kind = %violation.kind(),
                    "{violation}"
                );
                if self.contract.raise_on_violation() {
                    Err(CallError::Violation(violation))
                } else {
                    Ok(Outcome::Violated(violation))
                }
            }
            Err(other) => Err(other),
        }
    }

    fn enforce(&self, caller: &Caller, args: &Args) -> Result<Value, CallError> {
        let name = self.function.name.as_str();

        let spec = match self.contract.spec(name) {
            Some(spec) if self.contract.is_declared(name) => spec,
            _ => {
                return Err(Violation::FunctionNotDeclared {
                    function: name.to_string(),
                }
                .into())
            }
        };

        let graph = self.graphs.function_graph(&self.function.source, name)?;
        if let Some(call) = graph
            .call_names()
            .find(|call| !self.contract.is_call_allowed(name, call))
        {
            return Err(Violation::CallNotAllowed {
                function: name.to_string(),
                call: call.to_string(),
            }
            .into());
        }
        tracing::debug!(function = name, calls = graph.calls.len(), "call graph permitted");

        if !spec.allowed_callers.contains(caller.identifier()) {
            return Err(Violation::CallerNotAllowed {
                function: name.to_string(),
                caller: caller.identifier().to_string(),
            }
            .into());
        }

        let bound = bind(&self.function.params, args).map_err(|e| Violation::UnboundParameters {
            function: name.to_string(),
            reason: e.to_string(),
        })?;
        check_params(name, spec, &bound)?;

        let invocation = Invocation {
            function: name,
            args: &bound,
        };
        let value = match spec.timeout() {
            Some(limit) => {
                tracing::debug!(function = name, ?limit, "running in isolated worker");
                match run_isolated(limit, || (self.function.body)(&invocation))? {
                    Timed::Finished(result) => result?,
                    Timed::Expired => {
                        return Err(Violation::TimeoutExceeded {
                            function: name.to_string(),
                            limit_seconds: spec.max_runtime_seconds,
                        }
                        .into())
                    }
                }
            }
            None => (self.function.body)(&invocation)?,
        };

        if !spec.returns.test(&value) {
            return Err(Violation::ReturnInvalid {
                function: name.to_string(),
                value: value.to_string(),
                expected: spec.returns.name().to_string(),
            }
            .into());
        }
        Ok(value)
    }
}

fn check_params(name: &str, spec: &FunctionSpec, bound: &BoundArgs) -> Result<(), Violation> {
    if let Some((param, _)) = bound.iter().find(|(p, _)| !spec.params.contains_key(*p)) {
        return Err(Violation::ParamNotDeclared {
            function: name.to_string(),
            param: param.to_string(),
        });
    }
    for (param, value) in bound.iter() {
        let Some(predicate) = spec.params.get(param) else {
            continue;
        };
        if !predicate.test(value) {
            return Err(Violation::ParamInvalid {
                function: name.to_string(),
                param: param.to_string(),
                expected: predicate.name().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
