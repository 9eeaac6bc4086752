//! warden CLI: contract validation and static contract checking.
//!
//! This binary provides the `warden` command with subcommands for validating contract
//! files against a schema and checking source trees against a contract. See
//! `warden --help` for usage.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_args;
mod commands;

use cli_args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let formatter: Box<dyn warden_output::OutputFormatter> = if cli.json {
        Box::new(warden_output::json::JsonFormatter)
    } else {
        Box::new(warden_output::human::HumanFormatter)
    };

    let exit_code = match cli.command {
        Commands::Schema { contract, schema } => {
            commands::schema::run(&*formatter, &contract, schema.as_deref())
        }
        Commands::Check {
            contract,
            schema,
            marker,
            paths,
        } => commands::check::run(
            &*formatter,
            &contract,
            schema.as_deref(),
            marker,
            paths,
        ),
        Commands::Completion { shell } => commands::completion::run(&shell),
    };

    std::process::exit(exit_code);
}

/// Logs go to stderr. `WARDEN_LOG` takes precedence over `--debug`.
fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("WARDEN_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
