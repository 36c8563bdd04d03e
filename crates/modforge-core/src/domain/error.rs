// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so services can attach them to several reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid module configuration: {0}")]
    InvalidModule(String),

    #[error("Invalid platform '{input}': {reason}")]
    InvalidPlatform { input: String, reason: String },

    #[error("Unknown module kind '{0}'")]
    UnknownModuleKind(String),

    #[error("Absolute path required: {path}")]
    AbsolutePathRequired { path: String },

    #[error("Relative path required: {path}")]
    RelativePathRequired { path: String },

    #[error("No relative path from '{from}' to '{to}' (different roots)")]
    UnrelatedPaths { from: String, to: String },

    #[error("Invalid configuration key path '{path}'")]
    InvalidKeyPath { path: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    // ========================================================================
    // Typed access
    // ========================================================================
    #[error("Configuration key '{key}' is a {found}, expected {expected}")]
    ConfigKey {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    // ========================================================================
    // Dependency resolution
    // ========================================================================
    #[error("Cannot resolve dependency '{dependency}': {reason}")]
    DependencyResolution { dependency: String, reason: String },

    #[error(
        "Dependency '{dependency}' exposes products it does not provide: {}",
        missing.join(", ")
    )]
    ExposedProductsUnavailable {
        dependency: String,
        missing: Vec<String>,
    },

    // ========================================================================
    // Workspace invariants
    // ========================================================================
    #[error("Duplicate workspace member path: {path}")]
    DuplicateMember { path: String },

    // ========================================================================
    // Module tree
    // ========================================================================
    #[error("Module '{module}' renders no files")]
    EmptyModuleTree { module: String },

    #[error("Path '{path}' is produced twice")]
    DuplicatePath { path: String },

    #[error("Generated path must be relative: {path}")]
    AbsolutePathNotAllowed { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidModule(msg) => vec![
                "Check the module name and kind".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidPlatform { .. } => vec![
                "Platforms are written as <os>@<version>".into(),
                "  • ios@15, macos@13, tvos@15, watchos@8, visionos@1".into(),
            ],
            Self::UnknownModuleKind(_) => vec![
                "Supported module kinds:".into(),
                "  • core, feature, shared, microapp".into(),
            ],
            Self::ConfigKey { key, expected, .. } => vec![
                format!("Set '{}' to a {} value", key, expected),
                format!("Try: modforge config get {}", key),
            ],
            Self::DependencyResolution { dependency, .. } => vec![
                format!("Check the path declared for '{}'", dependency),
                "Local dependencies must be absolute paths to existing packages".into(),
            ],
            Self::ExposedProductsUnavailable { dependency, .. } => vec![
                format!("Only expose products that '{}' declares", dependency),
                "Check the products listed in its Package.swift".into(),
            ],
            Self::DuplicateMember { path } => vec![
                format!("'{}' appears more than once in the workspace", path),
                "Remove the duplicate entry from the container file".into(),
            ],
            Self::EmptyModuleTree { module } => vec![
                format!("No templates are registered for '{}'", module),
                "Run 'modforge templates' to see the built-in templates".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidModule(_)
            | Self::InvalidPlatform { .. }
            | Self::UnknownModuleKind(_)
            | Self::AbsolutePathRequired { .. }
            | Self::RelativePathRequired { .. }
            | Self::UnrelatedPaths { .. }
            | Self::InvalidKeyPath { .. }
            | Self::MissingRequiredField { .. }
            | Self::DuplicateMember { .. }
            | Self::EmptyModuleTree { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::ConfigKey { .. } => ErrorCategory::Configuration,
            Self::DependencyResolution { .. } | Self::ExposedProductsUnavailable { .. } => {
                ErrorCategory::Resolution
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Resolution,
}
