use std::path::Path;

use warden_core::contract::Contract;
use warden_enforce::report::SchemaResult;
use warden_output::OutputFormatter;

use super::contract_file;

/// Run `warden schema --contract <file>` -- validate a contract without checking code.
pub fn run(formatter: &dyn OutputFormatter, contract: &Path, schema: Option<&str>) -> i32 {
    let config = contract_file::load_config();

    let description = match contract_file::read_description(contract) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("warden schema: {e}");
            return 2;
        }
    };

    let (schema_name, schema) = match contract_file::resolve_schema(schema, &config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("warden schema: {e}");
            return 2;
        }
    };

    let mut result = SchemaResult {
        contract: contract.display().to_string(),
        schema: schema_name,
        valid: false,
        error: None,
        functions: Vec::new(),
    };
    let exit_code = match Contract::from_description(&description, &schema) {
        Ok(c) => {
            result.valid = true;
            result.functions = c.declared_functions().to_vec();
            0
        }
        Err(e) => {
            tracing::debug!(error = %e, "contract rejected by schema");
            result.error = Some(e.to_string());
            2
        }
    };

    println!("{}", formatter.format_schema(&result).trim_end());
    exit_code
}
