use std::path::{Path, PathBuf};

use rayon::prelude::*;
use warden_core::contract::Contract;
use warden_enforce::report::{CheckResult, FileFailure, FileReport};
use warden_enforce::validator::{analyze_with, ValidatorOptions};
use warden_output::OutputFormatter;
use warden_parsers::source::SourceUnit;
use warden_parsers::walker::{FileWalker, WalkEntry};

use super::contract_file;

/// Run `warden check --contract <file> [PATHS]` -- static contract check.
///
/// Exit codes: 0 clean, 1 violations found, 2 contract or file load errors.
pub fn run(
    formatter: &dyn OutputFormatter,
    contract_path: &Path,
    schema: Option<&str>,
    marker: Option<String>,
    paths: Vec<PathBuf>,
) -> i32 {
    let config = contract_file::load_config();

    let contract = match load_contract(contract_path, schema, &config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("warden check: {e}");
            return 2;
        }
    };

    let mut options = ValidatorOptions::from(&config);
    if let Some(marker) = marker {
        options.marker = marker;
    }

    let roots = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };

    let mut entries: Vec<WalkEntry> = Vec::new();
    for root in &roots {
        if !root.exists() {
            eprintln!("warden check: path not found: {}", root.display());
            return 2;
        }
        entries.extend(
            FileWalker::new(root)
                .with_ignore_patterns(&config.ignore_patterns)
                .walk()
                .into_iter()
                .filter(|e| config.analyzes(e.language.name())),
        );
    }
    tracing::info!(files = entries.len(), "checking files against contract");

    let outcomes: Vec<Result<FileReport, FileFailure>> = entries
        .par_iter()
        .map(|entry| check_file(&contract, &options, entry))
        .collect();

    let mut result = CheckResult::new(contract_path.display().to_string());
    for outcome in outcomes {
        match outcome {
            Ok(report) => result.add_file(report),
            Err(failure) => result.failures.push(failure),
        }
    }

    println!("{}", formatter.format_check(&result).trim_end());

    if !result.failures.is_empty() {
        2
    } else if result.total_count > 0 {
        1
    } else {
        0
    }
}

fn load_contract(
    path: &Path,
    schema: Option<&str>,
    config: &warden_core::config::WardenConfig,
) -> Result<Contract, String> {
    let description = contract_file::read_description(path)?;
    let (_, schema) = contract_file::resolve_schema(schema, config).map_err(|e| e.to_string())?;
    Contract::from_description(&description, &schema)
        .map_err(|e| format!("{}: {e}", path.display()))
}

fn check_file(
    contract: &Contract,
    options: &ValidatorOptions,
    entry: &WalkEntry,
) -> Result<FileReport, FileFailure> {
    let file = entry.path.display().to_string();
    let text = std::fs::read_to_string(&entry.path).map_err(|e| FileFailure {
        file: file.clone(),
        message: e.to_string(),
    })?;
    let unit = SourceUnit::new(entry.language, text);
    match analyze_with(contract, &unit, options) {
        Ok(report) => Ok(FileReport {
            file,
            language: entry.language.name().to_string(),
            report,
        }),
        Err(e) => {
            tracing::warn!(file = %file, error = %e, "skipping unanalyzable file");
            Err(FileFailure {
                file,
                message: e.to_string(),
            })
        }
    }
}
