//! `modforge templates` - list the templates a module is rendered from.

use serde::Serialize;

use modforge_core::{application::ApplicationError, prelude::TemplateRenderer};

use crate::{
    cli::TemplatesArgs,
    commands::Services,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct TemplateEntry {
    name: String,
    origin: &'static str,
}

pub fn execute(args: TemplatesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let services = Services::local();
    let overrides = services.template_overrides(&config)?;
    let renderer = services.renderer(&config)?;

    if let Some(name) = args.show {
        let source = renderer.source(&name).ok_or_else(|| {
            let mut known = renderer.template_names();
            known.sort();
            ApplicationError::TemplateNotFound {
                name: name.clone(),
                known,
            }
        })?;
        output.data(source.trim_end())?;
        return Ok(());
    }

    let mut names = renderer.template_names();
    names.sort();
    let entries: Vec<TemplateEntry> = names
        .into_iter()
        .map(|name| TemplateEntry {
            origin: if overrides.contains_key(&name) {
                "override"
            } else {
                "built-in"
            },
            name,
        })
        .collect();

    if output.is_json() {
        output.json(&entries)?;
        return Ok(());
    }

    output.header("Templates:")?;
    for entry in &entries {
        output.data(&format!("  {:<20} {}", entry.name, entry.origin))?;
    }
    if let Some(dir) = &config.templates_dir {
        output.info(&format!("Overrides from {}", dir.display()))?;
    }

    Ok(())
}
