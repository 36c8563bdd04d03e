//! `modforge`: scaffold Swift package modules and maintain workspace containers.
//!
//! Every failure surfaces as a [`CliError`]; its category picks the exit
//! status (0 success, 1 internal, 2 bad input, 3 missing resource, 4 broken
//! configuration). Clap's own help and version exits keep clap's status.

use std::io::{self, IsTerminal as _};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // `.env` may carry MODFORGE_TEMPLATES_DIR or NO_COLOR, so it loads first.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(parse_failure_status(&err));
        }
    };

    let verbose = cli.global.verbose > 0;
    let color = !cli.global.no_color && io::stderr().is_terminal();

    match start(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.log();
            eprint!("{}", err.render(verbose, color));
            ExitCode::from(err.exit_code())
        }
    }
}

fn start(cli: Cli) -> CliResult<()> {
    logging::init_logging(&cli.global)?;

    let config = AppConfig::load(&cli.global).map_err(|e| CliError::ConfigError {
        message: format!("{e:#}"),
        source: Some(e.into()),
    })?;
    debug!(
        working_dir = %config.working_dir.display(),
        project_config = %config.project_config.display(),
        "settings located"
    );

    let output = OutputManager::new(&cli.global, &config);
    dispatch(cli.command, config, output)
}

#[instrument(skip_all)]
fn dispatch(command: Commands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match command {
        Commands::New(args) => commands::new::execute(args, config, output),
        Commands::Workspace(cmd) => commands::workspace::execute(cmd, config, output),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
        Commands::Init(args) => commands::init::execute(args, config, output),
        Commands::Templates(args) => commands::templates::execute(args, config, output),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Clap reports 0 for `--help`/`--version` and 2 for usage errors.
fn parse_failure_status(err: &clap::Error) -> u8 {
    u8::try_from(err.exit_code()).unwrap_or(2)
}
