use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Languages warden can extract call graphs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    Python,
    Rust,
}

impl SourceLanguage {
    pub fn name(self) -> &'static str {
        match self {
            SourceLanguage::Python => "python",
            SourceLanguage::Rust => "rust",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "python" | "py" => Some(SourceLanguage::Python),
            "rust" | "rs" => Some(SourceLanguage::Rust),
            _ => None,
        }
    }

    /// Detect the language from a file extension.
    pub fn detect(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "py" | "pyi" => Some(SourceLanguage::Python),
            "rs" => Some(SourceLanguage::Rust),
            _ => None,
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A piece of source text together with its language: one function or a whole module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub language: SourceLanguage,
    pub text: String,
}

impl SourceUnit {
    pub fn new(language: SourceLanguage, text: impl Into<String>) -> Self {
        Self {
            language,
            text: text.into(),
        }
    }

    pub fn python(text: impl Into<String>) -> Self {
        Self::new(SourceLanguage::Python, text)
    }

    pub fn rust(text: impl Into<String>) -> Self {
        Self::new(SourceLanguage::Rust, text)
    }
}
