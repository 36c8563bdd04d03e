//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! logic. Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A configuration source exists but is not valid structured data.
    #[error("Cannot parse configuration at {}: {reason}", source_path.display())]
    ConfigParse { source_path: PathBuf, reason: String },

    /// The workspace container could not be read or written.
    #[error("Workspace I/O failed at {}: {reason}", path.display())]
    WorkspaceIo { path: PathBuf, reason: String },

    /// The container file exists but cannot be decoded or is structurally broken.
    #[error("Workspace container at {} is corrupt: {reason}", path.display())]
    WorkspaceCorruption { path: PathBuf, reason: String },

    /// The renderer does not know a template name.
    #[error("Template '{name}' not found")]
    TemplateNotFound { name: String, known: Vec<String> },

    /// Template rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// A module already exists at the target location.
    #[error("Module already exists at {}", path.display())]
    ProjectExists { path: PathBuf },

    /// The package toolchain could not resolve the generated package.
    #[error("Package resolution failed in {}: {reason}", path.display())]
    ToolchainFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigParse { source_path, .. } => vec![
                format!("Fix the TOML syntax in {}", source_path.display()),
                "Try: modforge config path to list the files that are read".into(),
            ],
            Self::WorkspaceIo { path, .. } => vec![
                format!("Check access to {}", path.display()),
                "Try: modforge workspace create <name> to start a new workspace".into(),
            ],
            Self::WorkspaceCorruption { path, .. } => vec![
                format!("Inspect {} by hand", path.display()),
                "Try: modforge workspace validate to locate the defect".into(),
            ],
            Self::TemplateNotFound { known, .. } => {
                let mut out = vec!["Known templates:".to_string()];
                out.extend(known.iter().map(|k| format!("  • {k}")));
                out
            }
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different module name".into(),
            ],
            Self::ToolchainFailed { .. } => vec![
                "Run 'swift package resolve' in the module directory for details".into(),
                "Or: modforge config set skipDependencyResolver true".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigParse { .. } => ErrorCategory::Configuration,
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::WorkspaceIo { .. } | Self::WorkspaceCorruption { .. } => ErrorCategory::Workspace,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::RenderingFailed { .. }
            | Self::ToolchainFailed { .. } => ErrorCategory::Internal,
        }
    }
}
