use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use warden_core::violation::ViolationKind;

/// Kinds of finding the static validator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Call,
    Import,
    UndeclaredFunction,
    UndefinedFunction,
    UndecoratedClass,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Call => "call",
            RecordKind::Import => "import",
            RecordKind::UndeclaredFunction => "undeclared_function",
            RecordKind::UndefinedFunction => "undefined_function",
            RecordKind::UndecoratedClass => "undecorated_class",
        }
    }

    /// The taxonomy entry this finding belongs to.
    pub fn violation_kind(self) -> ViolationKind {
        match self {
            RecordKind::Call => ViolationKind::CallNotAllowed,
            RecordKind::Import => ViolationKind::ImportNotAllowed,
            RecordKind::UndeclaredFunction => ViolationKind::UndeclaredFunction,
            RecordKind::UndefinedFunction => ViolationKind::UndefinedFunction,
            RecordKind::UndecoratedClass => ViolationKind::UndecoratedClass,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One static finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub kind: RecordKind,
    /// `None` for declared functions that have no definition at all.
    pub line: Option<u32>,
    /// The offending name: callee, module, function, or class.
    pub subject: String,
    /// The containing function, for call findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ViolationRecord {
    pub fn new(kind: RecordKind, line: Option<u32>, subject: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            subject: subject.into(),
            context: None,
        }
    }

    pub fn in_function(mut self, function: impl Into<String>) -> Self {
        self.context = Some(function.into());
        self
    }
}

/// Everything the static validator found in one module, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationReport {
    pub call_violations: Vec<ViolationRecord>,
    pub import_violations: Vec<ViolationRecord>,
    pub undeclared_functions: Vec<ViolationRecord>,
    pub undefined_functions: Vec<ViolationRecord>,
    pub undecorated_classes: Vec<ViolationRecord>,
    pub total_count: usize,
    /// Declared functions to the permitted names each one calls, first use first.
    pub call_graph: BTreeMap<String, Vec<String>>,
}

impl ViolationReport {
    /// File a record under its kind. Records are never deduplicated.
    pub fn record(&mut self, record: ViolationRecord) {
        let bucket = match record.kind {
            RecordKind::Call => &mut self.call_violations,
            RecordKind::Import => &mut self.import_violations,
            RecordKind::UndeclaredFunction => &mut self.undeclared_functions,
            RecordKind::UndefinedFunction => &mut self.undefined_functions,
            RecordKind::UndecoratedClass => &mut self.undecorated_classes,
        };
        bucket.push(record);
        self.total_count += 1;
    }

    pub fn is_clean(&self) -> bool {
        self.total_count == 0
    }

    /// All records, grouped in kind order.
    pub fn records(&self) -> impl Iterator<Item = &ViolationRecord> {
        self.call_violations
            .iter()
            .chain(&self.import_violations)
            .chain(&self.undeclared_functions)
            .chain(&self.undefined_functions)
            .chain(&self.undecorated_classes)
    }
}

/// The report for one analyzed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub language: String,
    #[serde(flatten)]
    pub report: ViolationReport,
}

/// A file that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub message: String,
}

/// Result of checking a set of files against one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub contract: String,
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    pub total_count: usize,
}

impl CheckResult {
    pub fn new(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            ..Default::default()
        }
    }

    pub fn add_file(&mut self, file: FileReport) {
        self.total_count += file.report.total_count;
        self.files.push(file);
    }

    pub fn is_clean(&self) -> bool {
        self.total_count == 0 && self.failures.is_empty()
    }
}

/// Result of validating a contract against its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaResult {
    pub contract: String,
    pub schema: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Declared functions, when valid.
    #[serde(default)]
    pub functions: Vec<String>,
}
