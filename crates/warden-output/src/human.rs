use crate::human_helpers::format_sections;
use crate::OutputFormatter;
use warden_enforce::report::{CheckResult, SchemaResult};

pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_check(&self, result: &CheckResult) -> String {
        let mut out = String::new();

        for file in result.files.iter().filter(|f| !f.report.is_clean()) {
            out.push_str(&format!("{}\n\n", file.file));
            out.push_str(&format_sections(&file.report));
        }

        for failure in &result.failures {
            out.push_str(&format!("error: {}: {}\n", failure.file, failure.message));
        }
        if !result.failures.is_empty() {
            out.push('\n');
        }

        out.push_str(&format!("Total Violations: {}\n", result.total_count));
        out
    }

    fn format_schema(&self, result: &SchemaResult) -> String {
        if result.valid {
            format!(
                "{}: valid against schema {} ({} function(s) declared)\n",
                result.contract,
                result.schema,
                result.functions.len(),
            )
        } else {
            format!(
                "error: {}: {}\n",
                result.contract,
                result.error.as_deref().unwrap_or("invalid contract"),
            )
        }
    }
}
