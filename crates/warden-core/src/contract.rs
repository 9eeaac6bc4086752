//! The validated contract model.
//!
//! A [`Contract`] is only ever produced from a description that passed schema
//! validation, and every declared function is guaranteed to have a [`FunctionSpec`].
//! Contracts are immutable; policy evolution goes through [`Contract::revise`], which
//! yields a new value and re-checks the invariants.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::descriptor::{ContractDescription, Descriptor};
use crate::predicate::Predicate;
use crate::schema::{Schema, SchemaError, FUNCTIONS_KEY};

/// Per-function section of a contract.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    /// Parameter name to value predicate.
    pub params: BTreeMap<String, Predicate>,
    pub returns: Predicate,
    /// Names this function may call, on top of the contract's global allow-list.
    pub allowable_calls: BTreeSet<String>,
    /// `<= 0` disables timeout enforcement and runs the function in-process.
    pub max_runtime_seconds: f64,
    /// Caller identifiers permitted to invoke this function.
    pub allowed_callers: BTreeSet<String>,
}

impl Default for FunctionSpec {
    fn default() -> Self {
        Self {
            params: BTreeMap::new(),
            returns: Predicate::Any,
            allowable_calls: BTreeSet::new(),
            max_runtime_seconds: 0.0,
            allowed_callers: BTreeSet::new(),
        }
    }
}

impl FunctionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, predicate: Predicate) -> Self {
        self.params.insert(name.into(), predicate);
        self
    }

    pub fn returns(mut self, predicate: Predicate) -> Self {
        self.returns = predicate;
        self
    }

    pub fn allow_call(mut self, name: impl Into<String>) -> Self {
        self.allowable_calls.insert(name.into());
        self
    }

    pub fn allow_caller(mut self, name: impl Into<String>) -> Self {
        self.allowed_callers.insert(name.into());
        self
    }

    pub fn max_runtime_seconds(mut self, seconds: f64) -> Self {
        self.max_runtime_seconds = seconds;
        self
    }

    /// The enforced time budget, or `None` when the function runs in-process.
    ///
    /// A positive budget too large for a `Duration` saturates to `Duration::MAX`: the
    /// function still runs isolated, with no effective deadline.
    pub fn timeout(&self) -> Option<Duration> {
        if self.max_runtime_seconds.is_nan() || self.max_runtime_seconds <= 0.0 {
            return None;
        }
        Some(Duration::try_from_secs_f64(self.max_runtime_seconds).unwrap_or(Duration::MAX))
    }
}

/// A validated, immutable contract.
#[derive(Debug, Clone)]
pub struct Contract {
    raise_on_violation: bool,
    declared_functions: Vec<String>,
    allowable_imports: BTreeSet<String>,
    global_allowed_calls: BTreeSet<String>,
    function_specs: BTreeMap<String, FunctionSpec>,
}

impl Contract {
    /// Validate a description against `schema` and build the typed contract.
    pub fn from_description(
        desc: &ContractDescription,
        schema: &Schema,
    ) -> Result<Self, SchemaError> {
        schema.validate(desc)?;

        let declared_functions = string_list(desc.get(FUNCTIONS_KEY), FUNCTIONS_KEY)?;
        let mut function_specs = BTreeMap::new();
        for name in &declared_functions {
            let spec = desc
                .get(name)
                .and_then(Descriptor::as_map)
                .ok_or_else(|| SchemaError::MissingFunctionSpec {
                    function: name.clone(),
                })?;
            function_specs.insert(name.clone(), function_spec(name, spec)?);
        }

        ContractDraft {
            raise_on_violation: match desc.get("raise_on_contract_exception") {
                Some(Descriptor::Bool(b)) => *b,
                _ => true,
            },
            declared_functions,
            allowable_imports: string_list(desc.get("allowable_imports"), "allowable_imports")?
                .into_iter()
                .collect(),
            global_allowed_calls: string_list(
                desc.get("global_allowed_calls"),
                "global_allowed_calls",
            )?
            .into_iter()
            .collect(),
            function_specs,
        }
        .seal()
    }

    pub fn raise_on_violation(&self) -> bool {
        self.raise_on_violation
    }

    /// Declared function names, in declaration order.
    pub fn declared_functions(&self) -> &[String] {
        &self.declared_functions
    }

    pub fn is_declared(&self, function: &str) -> bool {
        self.declared_functions.iter().any(|f| f == function)
    }

    pub fn allowable_imports(&self) -> &BTreeSet<String> {
        &self.allowable_imports
    }

    pub fn global_allowed_calls(&self) -> &BTreeSet<String> {
        &self.global_allowed_calls
    }

    pub fn spec(&self, function: &str) -> Option<&FunctionSpec> {
        self.function_specs.get(function)
    }

    /// Whether `function` may call `call`: the global allow-list or its own.
    pub fn is_call_allowed(&self, function: &str, call: &str) -> bool {
        self.global_allowed_calls.contains(call)
            || self
                .spec(function)
                .is_some_and(|s| s.allowable_calls.contains(call))
    }

    pub fn is_import_allowed(&self, import: &str) -> bool {
        self.allowable_imports.contains(import)
    }

    /// Copy the contract into an editable draft.
    pub fn to_draft(&self) -> ContractDraft {
        ContractDraft {
            raise_on_violation: self.raise_on_violation,
            declared_functions: self.declared_functions.clone(),
            allowable_imports: self.allowable_imports.clone(),
            global_allowed_calls: self.global_allowed_calls.clone(),
            function_specs: self.function_specs.clone(),
        }
    }

    /// Produce an evolved contract. The original is left untouched.
    pub fn revise<F>(&self, edit: F) -> Result<Contract, SchemaError>
    where
        F: FnOnce(&mut ContractDraft),
    {
        let mut draft = self.to_draft();
        edit(&mut draft);
        draft.seal()
    }
}

/// An editable contract. Becomes a [`Contract`] through [`ContractDraft::seal`].
#[derive(Debug, Clone, Default)]
pub struct ContractDraft {
    pub raise_on_violation: bool,
    pub declared_functions: Vec<String>,
    pub allowable_imports: BTreeSet<String>,
    pub global_allowed_calls: BTreeSet<String>,
    pub function_specs: BTreeMap<String, FunctionSpec>,
}

impl ContractDraft {
    /// Declare a function together with its spec.
    pub fn declare(&mut self, name: impl Into<String>, spec: FunctionSpec) -> &mut Self {
        let name = name.into();
        if !self.declared_functions.contains(&name) {
            self.declared_functions.push(name.clone());
        }
        self.function_specs.insert(name, spec);
        self
    }

    /// Mutable access to a function's spec, if present.
    pub fn spec_mut(&mut self, function: &str) -> Option<&mut FunctionSpec> {
        self.function_specs.get_mut(function)
    }

    /// Check the invariants and freeze the draft.
    pub fn seal(mut self) -> Result<Contract, SchemaError> {
        let mut seen = BTreeSet::new();
        self.declared_functions.retain(|f| seen.insert(f.clone()));
        for function in &self.declared_functions {
            if !self.function_specs.contains_key(function) {
                return Err(SchemaError::MissingFunctionSpec {
                    function: function.clone(),
                });
            }
        }
        Ok(Contract {
            raise_on_violation: self.raise_on_violation,
            declared_functions: self.declared_functions,
            allowable_imports: self.allowable_imports,
            global_allowed_calls: self.global_allowed_calls,
            function_specs: self.function_specs,
        })
    }
}

fn function_spec(
    name: &str,
    spec: &BTreeMap<String, Descriptor>,
) -> Result<FunctionSpec, SchemaError> {
    let mut params = BTreeMap::new();
    if let Some(entry) = spec.get("params") {
        let Some(map) = entry.as_map() else {
            return Err(invalid(format!("{name}.params"), "expected a map"));
        };
        for (param, value) in map {
            let predicate = value.as_predicate().ok_or_else(|| {
                invalid(
                    format!("{name}.params.{param}"),
                    format!("expected a predicate, found {}", value.kind_name()),
                )
            })?;
            params.insert(param.clone(), predicate);
        }
    }

    let returns = match spec.get("returns") {
        Some(value) => value.as_predicate().ok_or_else(|| {
            invalid(
                format!("{name}.returns"),
                format!("expected a predicate, found {}", value.kind_name()),
            )
        })?,
        None => Predicate::Any,
    };

    let max_runtime_seconds = match spec.get("max_runtime_seconds") {
        Some(Descriptor::Number(n)) if n.is_finite() => *n,
        Some(other) => {
            return Err(invalid(
                format!("{name}.max_runtime_seconds"),
                format!("expected a finite number, found {}", other.kind_name()),
            ))
        }
        None => 0.0,
    };

    Ok(FunctionSpec {
        params,
        returns,
        allowable_calls: string_list(spec.get("allowable_calls"), &format!("{name}.allowable_calls"))?
            .into_iter()
            .collect(),
        max_runtime_seconds,
        allowed_callers: string_list(spec.get("allowed_callers"), &format!("{name}.allowed_callers"))?
            .into_iter()
            .collect(),
    })
}

fn string_list(value: Option<&Descriptor>, path: &str) -> Result<Vec<String>, SchemaError> {
    let items = match value {
        Some(Descriptor::List(items)) => items,
        Some(other) => {
            return Err(invalid(
                path.to_string(),
                format!("expected a list, found {}", other.kind_name()),
            ))
        }
        None => return Ok(Vec::new()),
    };
    items
        .iter()
        .map(|item| match item {
            Descriptor::Text(s) => Ok(s.clone()),
            other => Err(invalid(
                path.to_string(),
                format!("expected strings, found {}", other.kind_name()),
            )),
        })
        .collect()
}

fn invalid(path: String, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidEntry {
        path,
        reason: reason.into(),
    }
}
