use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "warden", version, about = "Policy-enforced execution contracts")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as structured JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging (WARDEN_LOG overrides)
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Validate a contract file against its schema
    Schema {
        /// Contract file (JSON)
        #[arg(long)]
        contract: PathBuf,
        /// Built-in schema name or schema file (default: from config, else v1)
        #[arg(long)]
        schema: Option<String>,
    },

    /// Statically check source files against a contract
    Check {
        /// Contract file (JSON)
        #[arg(long)]
        contract: PathBuf,
        /// Built-in schema name or schema file (default: from config, else v1)
        #[arg(long)]
        schema: Option<String>,
        /// Decorator or attribute that marks a class as enforced
        #[arg(long)]
        marker: Option<String>,
        /// Files or directories to check (default: current directory)
        paths: Vec<PathBuf>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, elvish, powershell)
        shell: String,
    },
}

#[cfg(test)]
#[path = "cli_args_tests.rs"]
mod tests;
