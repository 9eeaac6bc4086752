//! Static contract validation.
//!
//! Reads a whole module and reports every place it departs from the contract. Nothing
//! is executed and the contract is only read.

use std::collections::{BTreeSet, HashSet};

use warden_core::config::WardenConfig;
use warden_core::contract::Contract;
use warden_parsers::extract::{outline, ExtractError, ImportSite};
use warden_parsers::source::SourceUnit;

use crate::report::{RecordKind, ViolationRecord, ViolationReport};

/// Decorator or attribute that marks a class as enforced.
pub const DEFAULT_MARKER: &str = "enforce_contract";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub marker: String,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

impl From<&WardenConfig> for ValidatorOptions {
    fn from(config: &WardenConfig) -> Self {
        Self {
            marker: config.marker.clone(),
        }
    }
}

pub fn analyze(contract: &Contract, unit: &SourceUnit) -> Result<ViolationReport, ExtractError> {
    analyze_with(contract, unit, &ValidatorOptions::default())
}

pub fn analyze_with(
    contract: &Contract,
    unit: &SourceUnit,
    options: &ValidatorOptions,
) -> Result<ViolationReport, ExtractError> {
    let module = outline(unit)?;
    let mut report = ViolationReport::default();

    for function in &module.functions {
        if !contract.is_declared(&function.name) {
            report.record(ViolationRecord::new(
                RecordKind::UndeclaredFunction,
                Some(function.line),
                &function.name,
            ));
            continue;
        }
        // Methods may share a name; their permitted callees merge.
        let mut permitted = report
            .call_graph
            .remove(&function.name)
            .unwrap_or_default();
        for call in &function.graph.calls {
            if contract.is_call_allowed(&function.name, &call.name) {
                if !permitted.contains(&call.name) {
                    permitted.push(call.name.clone());
                }
            } else {
                report.record(
                    ViolationRecord::new(RecordKind::Call, Some(call.line), &call.name)
                        .in_function(&function.name),
                );
            }
        }
        report.call_graph.insert(function.name.clone(), permitted);
    }

    let mut imports: Vec<&ImportSite> = module
        .imports
        .iter()
        .chain(module.functions.iter().flat_map(|f| &f.graph.imports))
        .collect();
    imports.sort_by_key(|site| site.line);
    for site in imports {
        if !contract.is_import_allowed(&site.module) {
            report.record(ViolationRecord::new(
                RecordKind::Import,
                Some(site.line),
                &site.module,
            ));
        }
    }

    let defined: HashSet<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
    for name in contract.declared_functions() {
        if !defined.contains(name.as_str()) {
            report.record(ViolationRecord::new(RecordKind::UndefinedFunction, None, name));
        }
    }

    for class in &module.classes {
        if !class.markers.iter().any(|m| m == &options.marker) {
            report.record(ViolationRecord::new(
                RecordKind::UndecoratedClass,
                Some(class.line),
                &class.name,
            ));
        }
    }

    let kinds: BTreeSet<&str> = report.records().map(|r| r.kind.as_str()).collect();
    tracing::info!(
        language = %unit.language,
        functions = module.functions.len(),
        classes = module.classes.len(),
        violations = report.total_count,
        ?kinds,
        "static analysis complete"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
