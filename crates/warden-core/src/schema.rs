//! Schema descriptions and contract shape validation.
//!
//! A schema enumerates the keys a contract must carry globally and per declared
//! function, each with an expected [`Kind`]. Schemas are data, so callers can version
//! them (`v1`, their own JSON file, ...) without touching the engine.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::{ContractDescription, Descriptor};

/// Expected kind of a contract entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bool,
    /// Integers and floats are both accepted.
    Number,
    String,
    List,
    Map,
    /// A predicate, or a string naming a built-in predicate.
    Predicate,
}

impl Kind {
    pub fn matches(self, value: &Descriptor) -> bool {
        match self {
            Kind::Bool => matches!(value, Descriptor::Bool(_)),
            Kind::Number => matches!(value, Descriptor::Number(_)),
            Kind::String => matches!(value, Descriptor::Text(_)),
            Kind::List => matches!(value, Descriptor::List(_)),
            Kind::Map => matches!(value, Descriptor::Map(_)),
            Kind::Predicate => value.as_predicate().is_some(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Predicate => "predicate",
        }
    }
}

/// A contract shape defect. Always fatal, never downgraded by `raise_on_contract_exception`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("either `{key}` not in contract or not instance of `{expected}` (found {found})")]
    GlobalKey {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("the function `{function}` declared in functions but not defined")]
    MissingFunctionSpec { function: String },
    #[error(
        "either `{key}` not in contract['{function}'] or not instance of `{expected}` (found {found})"
    )]
    FunctionKey {
        function: String,
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid entry in `{path}`: {reason}")]
    InvalidEntry { path: String, reason: String },
    #[error("unknown schema `{0}`")]
    UnknownSchema(String),
    #[error("failed to load schema: {0}")]
    Load(String),
}

/// A pluggable schema description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub version: String,
    pub globals: BTreeMap<String, Kind>,
    pub functions: BTreeMap<String, Kind>,
}

/// Key holding the ordered list of declared function names.
pub const FUNCTIONS_KEY: &str = "functions";

impl Schema {
    /// The built-in `v1` schema.
    pub fn v1() -> Self {
        let globals = [
            ("raise_on_contract_exception", Kind::Bool),
            ("allowable_imports", Kind::List),
            ("global_allowed_calls", Kind::List),
            (FUNCTIONS_KEY, Kind::List),
        ];
        let functions = [
            ("params", Kind::Map),
            ("returns", Kind::Predicate),
            ("allowable_calls", Kind::List),
            ("max_runtime_seconds", Kind::Number),
            ("allowed_callers", Kind::List),
        ];
        Schema {
            version: "v1".to_string(),
            globals: globals.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            functions: functions.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    /// Resolve a built-in schema by version name.
    pub fn by_name(name: &str) -> Result<Self, SchemaError> {
        match name {
            "v1" => Ok(Self::v1()),
            other => Err(SchemaError::UnknownSchema(other.to_string())),
        }
    }

    /// Parse a schema from its JSON form.
    pub fn from_json(content: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(content).map_err(|e| SchemaError::Load(e.to_string()))
    }

    /// Resolve a schema reference: a built-in version name, or a path to a JSON schema.
    pub fn resolve(reference: &str) -> Result<Self, SchemaError> {
        if let Ok(schema) = Self::by_name(reference) {
            return Ok(schema);
        }
        let path = Path::new(reference);
        if !path.is_file() {
            return Err(SchemaError::UnknownSchema(reference.to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| SchemaError::Load(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// Check a description's shape. Fails fast on the first mismatch.
    ///
    /// Global keys are checked first, then each name listed under `functions`, in
    /// declaration order.
    pub fn validate(&self, desc: &ContractDescription) -> Result<(), SchemaError> {
        for (key, kind) in &self.globals {
            check_entry(desc.get(key), *kind).map_err(|found| SchemaError::GlobalKey {
                key: key.clone(),
                expected: kind.name(),
                found,
            })?;
        }

        let declared = match desc.get(FUNCTIONS_KEY) {
            Some(Descriptor::List(items)) => items.as_slice(),
            Some(other) => {
                return Err(SchemaError::GlobalKey {
                    key: FUNCTIONS_KEY.to_string(),
                    expected: Kind::List.name(),
                    found: other.kind_name(),
                })
            }
            None => &[],
        };

        for entry in declared {
            let Descriptor::Text(function) = entry else {
                return Err(SchemaError::InvalidEntry {
                    path: FUNCTIONS_KEY.to_string(),
                    reason: format!("expected function name, found {}", entry.kind_name()),
                });
            };
            let spec = desc
                .get(function)
                .and_then(Descriptor::as_map)
                .ok_or_else(|| SchemaError::MissingFunctionSpec {
                    function: function.clone(),
                })?;
            for (key, kind) in &self.functions {
                check_entry(spec.get(key), *kind).map_err(|found| SchemaError::FunctionKey {
                    function: function.clone(),
                    key: key.clone(),
                    expected: kind.name(),
                    found,
                })?;
            }
        }
        tracing::debug!(schema = %self.version, functions = declared.len(), "contract shape valid");
        Ok(())
    }
}

fn check_entry(value: Option<&Descriptor>, kind: Kind) -> Result<(), &'static str> {
    match value {
        Some(v) if kind.matches(v) => Ok(()),
        Some(v) => Err(v.kind_name()),
        None => Err("nothing"),
    }
}
