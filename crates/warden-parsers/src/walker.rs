use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

use crate::source::SourceLanguage;

pub struct WalkEntry {
    pub path: PathBuf,
    pub language: SourceLanguage,
}

/// Collects analyzable source files under a root, honouring `.gitignore` and
/// `.wardenignore`.
pub struct FileWalker {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ignore_patterns: Vec::new(),
        }
    }

    /// Extra gitignore-style globs to skip, typically from `warden.json`.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore_patterns = patterns.to_vec();
        self
    }

    pub fn walk(&self) -> Vec<WalkEntry> {
        if self.root.is_file() {
            return SourceLanguage::detect(&self.root)
                .map(|language| WalkEntry {
                    path: self.root.clone(),
                    language,
                })
                .into_iter()
                .collect();
        }

        let mut entries = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .add_custom_ignore_filename(".wardenignore");

        if !self.ignore_patterns.is_empty() {
            let mut overrides = OverrideBuilder::new(&self.root);
            for pattern in &self.ignore_patterns {
                if let Err(e) = overrides.add(&format!("!{pattern}")) {
                    tracing::warn!(pattern = %pattern, error = %e, "ignoring invalid ignore pattern");
                }
            }
            match overrides.build() {
                Ok(o) => {
                    builder.overrides(o);
                }
                Err(e) => tracing::warn!(error = %e, "failed to build ignore patterns"),
            }
        }

        let walker = builder.build();

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.into_path();
            if let Some(language) = SourceLanguage::detect(&path) {
                entries.push(WalkEntry { path, language });
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }
}
