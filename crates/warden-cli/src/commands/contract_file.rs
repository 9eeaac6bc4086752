//! Loading contract files and resolving the schema they are checked against.

use std::path::{Path, PathBuf};

use warden_core::config::WardenConfig;
use warden_core::descriptor::ContractDescription;
use warden_core::schema::{Schema, SchemaError};

/// Configuration for the current directory, from `.warden/warden.json` when present.
pub fn load_config() -> WardenConfig {
    let dir = std::env::current_dir()
        .map(|cwd| cwd.join(".warden"))
        .unwrap_or_else(|_| PathBuf::from(".warden"));
    WardenConfig::load(&dir)
}

/// Read a JSON contract file into an unvalidated description.
pub fn read_description(path: &Path) -> Result<ContractDescription, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    if !value.is_object() {
        return Err(format!("{}: contract must be a JSON object", path.display()));
    }
    Ok(ContractDescription::from_json(&value))
}

/// The explicit `--schema` wins over the configured one.
pub fn resolve_schema(
    explicit: Option<&str>,
    config: &WardenConfig,
) -> Result<(String, Schema), SchemaError> {
    let reference = explicit.unwrap_or(&config.schema).to_string();
    let schema = Schema::resolve(&reference)?;
    Ok((reference, schema))
}
