//! `modforge workspace` - manage workspace containers.

use std::path::Path;

use serde::Serialize;
use tracing::instrument;

use modforge_core::prelude::{MemberPackage, WorkspaceValidation};

use crate::{
    cli::WorkspaceCommands,
    commands::Services,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct MemberRow {
    name: String,
    path: String,
    kind: String,
}

impl From<&MemberPackage> for MemberRow {
    fn from(member: &MemberPackage) -> Self {
        Self {
            name: member.name().to_string(),
            path: member.path().display().to_string(),
            kind: member.kind().to_string(),
        }
    }
}

#[instrument(skip_all)]
pub fn execute(cmd: WorkspaceCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let registry = Services::local().registry();

    match cmd {
        WorkspaceCommands::Create { name, path } => {
            let dir = path
                .map(|p| config.absolute(&p))
                .unwrap_or_else(|| config.working_dir.clone());
            let created = registry.create_workspace(&dir, &name)?;
            output.success(&format!("Workspace '{name}' created"))?;
            output.data(&created.display().to_string())?;
        }

        WorkspaceCommands::Add { workspace, package } => {
            let workspace = config.absolute(&workspace);
            let package = config.absolute(&package);
            if registry.add_package(&package, &workspace)? {
                output.success(&format!(
                    "Added {} to {}",
                    package.display(),
                    display_name(&workspace)
                ))?;
            } else {
                output.info(&format!("{} is already registered", package.display()))?;
            }
        }

        WorkspaceCommands::Remove { workspace, package } => {
            let workspace = config.absolute(&workspace);
            let package = config.absolute(&package);
            if registry.remove_package(&package, &workspace)? {
                output.success(&format!(
                    "Removed {} from {}",
                    package.display(),
                    display_name(&workspace)
                ))?;
            } else {
                output.info(&format!("{} is not registered", package.display()))?;
            }
        }

        WorkspaceCommands::List { workspace, sorted } => {
            let workspace = config.absolute(&workspace);
            let mut members = registry.list_packages(&workspace)?;
            if sorted {
                members.sort_by(|a, b| a.name().cmp(b.name()));
            }
            let rows: Vec<MemberRow> = members.iter().map(MemberRow::from).collect();

            if output.is_json() {
                output.json(&rows)?;
                return Ok(());
            }

            if rows.is_empty() {
                output.info(&format!("{} has no members", display_name(&workspace)))?;
                return Ok(());
            }
            output.header(&format!("Members of {}:", display_name(&workspace)))?;
            let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
            for row in &rows {
                output.data(&format!(
                    "  {:<width$}  {:<7}  {}",
                    row.name, row.kind, row.path
                ))?;
            }
        }

        WorkspaceCommands::Validate { workspace } => {
            let workspace = config.absolute(&workspace);
            match registry.validate_workspace(&workspace)? {
                WorkspaceValidation::Valid { member_count } => {
                    output.success(&format!(
                        "{} is valid ({member_count} member{})",
                        display_name(&workspace),
                        if member_count == 1 { "" } else { "s" }
                    ))?;
                }
                WorkspaceValidation::Invalid { reason } => {
                    return Err(CliError::InvalidWorkspace {
                        path: workspace,
                        reason,
                    });
                }
            }
        }
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
