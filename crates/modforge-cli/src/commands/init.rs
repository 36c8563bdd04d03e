//! `modforge init` - write a starter configuration file.

use tracing::{info, instrument};

use modforge_core::prelude::ConfigurationLayer;

use crate::{
    cli::InitArgs,
    commands::{Services, config::layer_file},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Write the built-in defaults to the project (or `--user`) file so they can
/// be edited.
#[instrument(skip_all)]
pub fn execute(args: InitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let kind = args.layer.kind();
    let destination = layer_file(&config, kind)?;
    let services = Services::local();

    if services.filesystem.exists(&destination) && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            destination.display(),
        ))?;
        return Ok(());
    }

    let mut store = services.empty_store();
    for (key, value) in ConfigurationLayer::defaults().settings() {
        store.set(key, value.clone(), kind)?;
    }
    store.save(kind, &destination)?;

    info!(path = %destination.display(), layer = %kind, "Starter configuration written");
    output.success(&format!("Configuration created at {}", destination.display()))?;
    Ok(())
}
