//! Output formatters for warden command results.
//!
//! Provides two output modes:
//! - **Human** (default): per-kind sections and a violation total, for terminals
//! - **JSON** (`--json`): machine-readable structured output

pub mod human;
pub(crate) mod human_helpers;
pub mod json;

use warden_enforce::report::{CheckResult, SchemaResult};

pub trait OutputFormatter {
    fn format_check(&self, result: &CheckResult) -> String;
    fn format_schema(&self, result: &SchemaResult) -> String;
}
