//! Implementation of the `modforge new` command.
//!
//! Responsibility: translate CLI arguments into a `ModuleConfiguration`, call
//! the core generation service, and display results. No business logic lives
//! here.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use modforge_core::prelude::*;

use crate::{
    cli::NewArgs,
    commands::Services,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `modforge new` command.
///
/// 1. Parse dependency, platform and variable arguments
/// 2. Build and validate the module configuration
/// 3. Preview only, if `--dry-run`
/// 4. Confirm with the user when a terminal is attached
/// 5. Generate, then report resolution and workspace registration
#[instrument(skip_all, fields(module = %args.name))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let services = Services::local();
    let store = services.store(&config)?;

    let parent = args
        .path
        .as_ref()
        .map(|p| config.absolute(p))
        .unwrap_or_else(|| config.working_dir.clone());
    let target = parent.join(&args.name);

    let module = build_module(&args, target, &services, &config)?;
    debug!(
        kind = %module.kind(),
        locals = module.local_dependencies().len(),
        remotes = module.remote_dependencies().len(),
        "Module configuration built"
    );

    let generation = services.generation(&config)?;

    if args.dry_run {
        let tree = generation.preview(&module, store.merged())?;
        output.info(&format!(
            "Dry run: would create {} module '{}' at {}",
            module.kind(),
            module.name(),
            tree.root().display(),
        ))?;
        for file in tree.files() {
            output.data(&format!("  {}", file.path.display()))?;
        }
        return Ok(());
    }

    if !args.yes && !output.is_quiet() && output.is_interactive() {
        show_configuration(&module, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    let workspace = args.workspace.as_ref().map(|w| config.absolute(w));
    let options = GenerationOptions {
        force: args.force,
        workspace,
    };

    output.header(&format!("Creating '{}'...", module.name()))?;
    let report = generation.generate(&module, store.merged(), &options)?;
    info!(files = report.files.len(), root = %report.root.display(), "Module generated");

    output.success(&format!(
        "{} module '{}' created ({} files)",
        module.kind(),
        module.name(),
        report.files.len()
    ))?;

    match &report.resolution {
        ResolutionOutcome::Resolved => output.success("Package dependencies resolved")?,
        ResolutionOutcome::Skipped => output.info("Package resolution skipped")?,
        ResolutionOutcome::Failed(reason) => {
            output.warning(&format!("Package resolution failed: {reason}"))?
        }
    }

    if let Some((container, changed)) = &report.workspace {
        if *changed {
            output.success(&format!("Registered in {}", container.display()))?;
        } else {
            output.info(&format!("Already registered in {}", container.display()))?;
        }
    }

    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", report.root.display()))?;
        output.print("  swift build")?;
    }

    Ok(())
}

fn build_module(
    args: &NewArgs,
    target: PathBuf,
    services: &Services,
    config: &AppConfig,
) -> CliResult<ModuleConfiguration> {
    let resolver = services.resolver();
    let mut builder =
        ModuleConfiguration::builder(args.name.clone(), args.kind.into()).target_path(target);

    if let Some(author) = &args.author {
        builder = builder.author(author.clone());
    }
    if let Some(org) = &args.organization {
        builder = builder.organization(org.clone());
    }
    if let Some(id) = &args.bundle_id {
        builder = builder.bundle_identifier(id.clone());
    }

    for raw in &args.platform {
        builder = builder.platform(raw.parse::<Platform>()?);
    }

    for raw in &args.local {
        let (path, products) = parse_local(raw)?;
        builder = builder.local(resolver.local_dependency(&config.absolute(&path), products)?);
    }

    for raw in &args.remote {
        builder = builder.remote(parse_remote(raw)?);
    }

    for raw in &args.vars {
        let (key, value) = parse_variable(raw)?;
        builder = builder.variable(key, value);
    }

    Ok(builder.build()?)
}

// ── Argument parsing ──────────────────────────────────────────────────────────

/// `PATH` or `PATH:Product,Product`. A colon followed by a path separator is
/// part of the path (e.g. `C:\Packages\Core`).
pub fn parse_local(spec: &str) -> CliResult<(PathBuf, Option<Vec<String>>)> {
    if spec.trim().is_empty() {
        return Err(CliError::invalid_input("--local needs a package path"));
    }

    match spec.rsplit_once(':') {
        Some((path, products)) if !path.is_empty() && !products.contains(['/', '\\']) => {
            let products: Vec<String> = products
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
            if products.is_empty() {
                return Err(CliError::invalid_input(format!(
                    "'{spec}' names no products after ':'"
                )));
            }
            Ok((PathBuf::from(path), Some(products)))
        }
        _ => Ok((PathBuf::from(spec), None)),
    }
}

/// `NAME=URL@VERSION`. A bare version becomes `from: "VERSION"`; a version
/// containing `:` is used verbatim.
pub fn parse_remote(spec: &str) -> CliResult<RemoteDependency> {
    let (name, rest) = spec
        .split_once('=')
        .ok_or_else(|| CliError::invalid_input(format!("'{spec}' is not NAME=URL@VERSION")))?;
    let (url, version) = rest
        .rsplit_once('@')
        .filter(|(_, version)| !version.contains('/'))
        .ok_or_else(|| CliError::invalid_input(format!("'{spec}' is missing @VERSION")))?;

    let (name, url, version) = (name.trim(), url.trim(), version.trim());
    if name.is_empty() || url.is_empty() || version.is_empty() {
        return Err(CliError::invalid_input(format!(
            "'{spec}' needs a name, a URL and a version"
        )));
    }

    let constraint = if version.contains(':') {
        version.to_string()
    } else {
        format!("from: \"{version}\"")
    };
    Ok(RemoteDependency::new(name, url, constraint))
}

/// `KEY=VALUE`; the value may itself contain `=`.
pub fn parse_variable(spec: &str) -> CliResult<(String, Value)> {
    match spec.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), Value::from(value)))
        }
        _ => Err(CliError::invalid_input(format!("'{spec}' is not KEY=VALUE"))),
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(module: &ModuleConfiguration, out: &OutputManager) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Module:       {}", module.name()))?;
    out.print(&format!("  Kind:         {}", module.kind()))?;
    out.print(&format!("  Location:     {}", module.target_path().display()))?;
    for dep in module.local_dependencies() {
        out.print(&format!(
            "  Local:        {} ({})",
            dep.name(),
            dep.exposed().join(", ")
        ))?;
    }
    for dep in module.remote_dependencies() {
        out.print(&format!("  Remote:       {} {}", dep.name(), dep.constraint()))?;
    }
    out.print("")?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::from(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    Ok(true)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
