//! logcentral command-line entry point.
//!
//! Parses arguments, loads configuration, initializes logging and dispatches
//! to one handler per subcommand. Errors are printed to stderr and mapped to
//! exit codes by [`CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use logcentral_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config` subcommands report load failures themselves, so a broken
    // file must not stop logging from coming up.
    let loaded = commands::load_config(cli.config.as_deref()).await;

    let mut general = match &loaded {
        Ok(config) => config.general.clone(),
        Err(_) => GeneralConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
        general.validate()?;
    }
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;

    logcentral_core::metrics::describe_all();

    let writer = OutputWriter::new(cli.output);
    let config_path = cli.config_path().to_path_buf();

    match cli.command {
        Commands::Merge(args) => commands::merge::execute(args, &loaded?, &writer).await,
        Commands::Policy(args) => commands::policy::execute(args, &loaded?, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &config_path, &writer).await,
    }
}
