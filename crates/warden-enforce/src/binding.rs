//! Argument binding: positional and keyword arguments onto declared parameter names.

use serde_json::Value;

/// A declared parameter of a governed function.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// Arguments as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }
}

/// Arguments bound to parameter names, in declaration order, defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: Vec<(String, Value)>,
}

impl BoundArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("takes {expected} positional arguments but {given} were given")]
    TooManyPositional { expected: usize, given: usize },
    #[error("got an unexpected keyword argument `{0}`")]
    UnknownKeyword(String),
    #[error("got multiple values for argument `{0}`")]
    Duplicate(String),
    #[error("missing a required argument: `{0}`")]
    Missing(String),
}

pub fn bind(params: &[Param], args: &Args) -> Result<BoundArgs, BindError> {
    if args.positional.len() > params.len() {
        return Err(BindError::TooManyPositional {
            expected: params.len(),
            given: args.positional.len(),
        });
    }

    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    for (slot, value) in slots.iter_mut().zip(&args.positional) {
        *slot = Some(value.clone());
    }

    for (name, value) in &args.keyword {
        let index = params
            .iter()
            .position(|p| &p.name == name)
            .ok_or_else(|| BindError::UnknownKeyword(name.clone()))?;
        if slots[index].is_some() {
            return Err(BindError::Duplicate(name.clone()));
        }
        slots[index] = Some(value.clone());
    }

    let values = params
        .iter()
        .zip(slots)
        .map(|(param, slot)| {
            slot.or_else(|| param.default.clone())
                .map(|value| (param.name.clone(), value))
                .ok_or_else(|| BindError::Missing(param.name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BoundArgs { values })
}
