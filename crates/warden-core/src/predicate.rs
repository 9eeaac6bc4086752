//! Value predicates for parameter and return contracts.
//!
//! Predicates test the *bound runtime value*, never a static type. Named predicates can be
//! written in contract files as plain strings; custom predicates are closures supplied by
//! code that builds contracts programmatically.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

type CustomFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A test applied to a parameter or return value.
#[derive(Clone)]
pub enum Predicate {
    /// Accepts every value.
    Any,
    /// Accepts anything except `null`.
    NotNull,
    /// Accepts only `null`.
    Null,
    /// Accepts strings.
    String,
    /// Accepts any JSON number (integer or float).
    Number,
    /// Accepts numbers that are not integers.
    Float,
    /// Accepts integers.
    Integer,
    /// Accepts booleans.
    Bool,
    /// Accepts arrays.
    List,
    /// Accepts objects.
    Map,
    /// A caller-supplied test.
    Custom {
        label: String,
        test: Arc<CustomFn>,
    },
}

impl Predicate {
    /// Wrap a closure as a predicate.
    pub fn custom<F>(label: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate::Custom {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Resolve a named built-in predicate, as written in contract files.
    pub fn from_name(name: &str) -> Option<Self> {
        let predicate = match name {
            "any" => Predicate::Any,
            "not_none" | "not_null" => Predicate::NotNull,
            "none" | "null" => Predicate::Null,
            "string" | "str" => Predicate::String,
            "number" => Predicate::Number,
            "float" => Predicate::Float,
            "int" | "integer" => Predicate::Integer,
            "bool" => Predicate::Bool,
            "list" => Predicate::List,
            "map" | "dict" => Predicate::Map,
            _ => return None,
        };
        Some(predicate)
    }

    /// Short name used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Predicate::Any => "any",
            Predicate::NotNull => "not_null",
            Predicate::Null => "null",
            Predicate::String => "string",
            Predicate::Number => "number",
            Predicate::Float => "float",
            Predicate::Integer => "integer",
            Predicate::Bool => "bool",
            Predicate::List => "list",
            Predicate::Map => "map",
            Predicate::Custom { label, .. } => label,
        }
    }

    /// Apply the predicate to a value.
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::NotNull => !value.is_null(),
            Predicate::Null => value.is_null(),
            Predicate::String => value.is_string(),
            Predicate::Number => value.is_number(),
            Predicate::Float => value.is_f64(),
            Predicate::Integer => value.is_i64() || value.is_u64(),
            Predicate::Bool => value.is_boolean(),
            Predicate::List => value.is_array(),
            Predicate::Map => value.is_object(),
            Predicate::Custom { test, .. } => test(value),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.name())
    }
}
