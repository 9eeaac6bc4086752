use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use warden_core::hash::compute_source_hash;

use crate::extract::{extract_function, CallGraph, ExtractError};
use crate::source::SourceUnit;

/// Memoizes function-scope extraction by (function, language, source hash).
///
/// Edited source hashes differently, so a cached graph is never served for code that
/// changed since it was extracted.
#[derive(Debug, Default)]
pub struct CallGraphCache {
    entries: Mutex<HashMap<String, Arc<CallGraph>>>,
}

impl CallGraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function_graph(
        &self,
        unit: &SourceUnit,
        function: &str,
    ) -> Result<Arc<CallGraph>, ExtractError> {
        let key = compute_source_hash(unit.language.name(), function, &unit.text);
        if let Some(hit) = self.lock().get(&key) {
            return Ok(Arc::clone(hit));
        }
        let graph = Arc::new(extract_function(unit, function)?);
        self.lock().insert(key, Arc::clone(&graph));
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<CallGraph>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
