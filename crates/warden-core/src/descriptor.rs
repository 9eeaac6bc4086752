//! Untyped contract descriptions.
//!
//! A [`ContractDescription`] is what an external loader hands to warden: a tree of plain
//! values keyed the same way the contract file is written. It carries no guarantees until
//! it has been checked against a [`Schema`](crate::schema::Schema) and sealed into a
//! [`Contract`](crate::contract::Contract).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::predicate::Predicate;

/// One node of a contract description.
#[derive(Debug, Clone)]
pub enum Descriptor {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Descriptor>),
    Map(BTreeMap<String, Descriptor>),
    Predicate(Predicate),
}

impl Descriptor {
    /// Human-readable kind name, used in schema error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Descriptor::Null => "null",
            Descriptor::Bool(_) => "bool",
            Descriptor::Number(_) => "number",
            Descriptor::Text(_) => "string",
            Descriptor::List(_) => "list",
            Descriptor::Map(_) => "map",
            Descriptor::Predicate(_) => "predicate",
        }
    }

    /// Interpret this node as a predicate: either an attached predicate or the name of a
    /// built-in one.
    pub fn as_predicate(&self) -> Option<Predicate> {
        match self {
            Descriptor::Predicate(p) => Some(p.clone()),
            Descriptor::Text(name) => Predicate::from_name(name),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Descriptor>> {
        match self {
            Descriptor::Map(m) => Some(m),
            _ => None,
        }
    }

    fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Descriptor>> {
        match self {
            Descriptor::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&Value> for Descriptor {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Descriptor::Null,
            Value::Bool(b) => Descriptor::Bool(*b),
            Value::Number(n) => Descriptor::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Descriptor::Text(s.clone()),
            Value::Array(items) => Descriptor::List(items.iter().map(Descriptor::from).collect()),
            Value::Object(map) => Descriptor::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Descriptor::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Descriptor {
    fn from(b: bool) -> Self {
        Descriptor::Bool(b)
    }
}

impl From<f64> for Descriptor {
    fn from(n: f64) -> Self {
        Descriptor::Number(n)
    }
}

impl From<&str> for Descriptor {
    fn from(s: &str) -> Self {
        Descriptor::Text(s.to_string())
    }
}

impl From<Predicate> for Descriptor {
    fn from(p: Predicate) -> Self {
        Descriptor::Predicate(p)
    }
}

/// The top-level map of a contract description.
#[derive(Debug, Clone, Default)]
pub struct ContractDescription {
    entries: BTreeMap<String, Descriptor>,
}

impl ContractDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a JSON document. Non-object documents yield an empty description, which
    /// then fails schema validation on its first required key.
    pub fn from_json(value: &Value) -> Self {
        match Descriptor::from(value) {
            Descriptor::Map(entries) => Self { entries },
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Descriptor> {
        self.entries.get(key)
    }

    /// Set or replace a top-level entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Descriptor>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Attach a predicate to `function.params.param`, creating the intermediate maps when
    /// they are absent. Returns `false` when `function` exists but is not a map.
    pub fn set_param_predicate(
        &mut self,
        function: &str,
        param: &str,
        predicate: Predicate,
    ) -> bool {
        let spec = self
            .entries
            .entry(function.to_string())
            .or_insert_with(|| Descriptor::Map(BTreeMap::new()));
        let Some(spec) = spec.as_map_mut() else {
            return false;
        };
        let params = spec
            .entry("params".to_string())
            .or_insert_with(|| Descriptor::Map(BTreeMap::new()));
        match params.as_map_mut() {
            Some(params) => {
                params.insert(param.to_string(), Descriptor::Predicate(predicate));
                true
            }
            None => false,
        }
    }

    /// Attach a return predicate to `function.returns`.
    pub fn set_return_predicate(&mut self, function: &str, predicate: Predicate) -> bool {
        let spec = self
            .entries
            .entry(function.to_string())
            .or_insert_with(|| Descriptor::Map(BTreeMap::new()));
        match spec.as_map_mut() {
            Some(spec) => {
                spec.insert("returns".to_string(), Descriptor::Predicate(predicate));
                true
            }
            None => false,
        }
    }
}
