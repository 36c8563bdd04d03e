//! `modforge config` - read and write configuration values.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;

use modforge_core::prelude::{ConfigurationStore, LayerKind};

use crate::{
    cli::ConfigCommands,
    commands::Services,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct SettingRow {
    key: String,
    value: String,
    origin: Option<String>,
}

/// Dispatch to the correct config subcommand.
#[instrument(skip_all)]
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let services = Services::local();

    match cmd {
        ConfigCommands::Get { key } => {
            let store = services.store(&config)?;
            let value = store
                .get(&key)
                .ok_or_else(|| CliError::UnknownKey { key: key.clone() })?;
            if output.is_json() {
                output.json(value)?;
            } else {
                output.data(&value.to_string())?;
            }
        }

        ConfigCommands::Set { key, value, layer } => {
            let kind = layer.kind();
            let destination = layer_file(&config, kind)?;
            let mut store = services.store(&config)?;
            let stored = store.set_raw(&key, &value, kind)?;
            store.save(kind, &destination)?;
            output.success(&format!(
                "Set {key} = {stored} in {}",
                destination.display()
            ))?;
        }

        ConfigCommands::Unset { key, layer } => {
            let kind = layer.kind();
            let destination = layer_file(&config, kind)?;
            let mut store = services.store(&config)?;
            if store.unset(&key, kind)? {
                store.save(kind, &destination)?;
                output.success(&format!("Removed {key} from {}", destination.display()))?;
            } else {
                output.info(&format!("{key} is not set in the {kind} layer"))?;
            }
        }

        ConfigCommands::List => {
            let store = services.store(&config)?;
            let rows = setting_rows(&store);

            if output.is_json() {
                output.json(&rows)?;
                return Ok(());
            }

            output.header("Effective configuration:")?;
            let width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
            for row in &rows {
                let origin = row.origin.as_deref().unwrap_or("-");
                output.data(&format!(
                    "  {:<width$} = {}  ({origin})",
                    row.key, row.value
                ))?;
            }
        }

        ConfigCommands::Path => {
            let user = config.user_config.as_deref();
            output.data(&format!("user:    {}", describe_path(&services, user)))?;
            output.data(&format!(
                "project: {}",
                describe_path(&services, Some(config.project_config.as_path()))
            ))?;
            if let Some(dir) = &config.templates_dir {
                output.data(&format!(
                    "templates: {}",
                    describe_path(&services, Some(dir.as_path()))
                ))?;
            }
        }
    }

    Ok(())
}

/// File that persists the `kind` layer, or an error when there is none.
pub(crate) fn layer_file(config: &AppConfig, kind: LayerKind) -> CliResult<PathBuf> {
    config
        .path_for(kind)
        .map(Path::to_path_buf)
        .ok_or_else(|| CliError::ConfigError {
            message: format!("no file location is known for the {kind} layer"),
            source: None,
        })
}

fn setting_rows(store: &ConfigurationStore) -> Vec<SettingRow> {
    store
        .all_settings()
        .into_iter()
        .map(|(key, value)| SettingRow {
            origin: store.merged().origin(&key).map(|k| k.to_string()),
            key,
            value,
        })
        .collect()
}

fn describe_path(services: &Services, path: Option<&Path>) -> String {
    match path {
        Some(p) if services.filesystem.exists(p) => format!("{} (exists)", p.display()),
        Some(p) => format!("{} (missing)", p.display()),
        None => "unavailable on this platform".into(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
