//! Configuration file loading for warden.
//!
//! Reads `.warden/warden.json` and provides typed access to all settings.
//! Falls back to sensible defaults when the config file is missing or incomplete.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level warden configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    #[serde(default = "default_version")]
    pub version: String,
    /// Schema used to validate contracts: a built-in version name or a schema file path.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Decorator/attribute name that marks a class as contract-governed.
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Languages analyzed when walking directories.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_schema() -> String {
    "v1".to_string()
}
fn default_marker() -> String {
    "enforce_contract".to_string()
}
fn default_languages() -> Vec<String> {
    vec!["python".to_string(), "rust".to_string()]
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            schema: default_schema(),
            marker: default_marker(),
            languages: default_languages(),
            ignore_patterns: vec![],
        }
    }
}

impl WardenConfig {
    /// Load configuration from `warden.json` inside the given warden directory.
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(warden_dir: &Path) -> Self {
        let config_path = warden_dir.join("warden.json");
        let content = match std::fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Whether files of `language` should be analyzed.
    pub fn analyzes(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }
}
