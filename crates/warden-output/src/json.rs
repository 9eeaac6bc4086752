use crate::OutputFormatter;
use warden_enforce::report::{CheckResult, SchemaResult};

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_check(&self, result: &CheckResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_schema(&self, result: &SchemaResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
}
