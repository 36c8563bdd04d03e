//! Unified error handling for modforge core.
//!
//! [`ModforgeError`] wraps domain and application errors and exposes the
//! stable [`ErrorKind`] taxonomy callers match on.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for modforge core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModforgeError {
    /// Errors from the domain layer (business logic violations).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

/// Error taxonomy shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigParse,
    ConfigKey,
    DependencyResolution,
    WorkspaceIo,
    WorkspaceCorruption,
    TemplateNotFound,
    Validation,
    Filesystem,
    Internal,
}

impl ModforgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => match e {
                DomainError::ConfigKey { .. } => ErrorKind::ConfigKey,
                DomainError::DependencyResolution { .. }
                | DomainError::ExposedProductsUnavailable { .. } => ErrorKind::DependencyResolution,
                _ => ErrorKind::Validation,
            },
            Self::Application(e) => match e {
                ApplicationError::ConfigParse { .. } => ErrorKind::ConfigParse,
                ApplicationError::WorkspaceIo { .. } => ErrorKind::WorkspaceIo,
                ApplicationError::WorkspaceCorruption { .. } => ErrorKind::WorkspaceCorruption,
                ApplicationError::TemplateNotFound { .. } => ErrorKind::TemplateNotFound,
                ApplicationError::ProjectExists { .. } => ErrorKind::Validation,
                ApplicationError::FilesystemError { .. } => ErrorKind::Filesystem,
                ApplicationError::RenderingFailed { .. }
                | ApplicationError::ToolchainFailed { .. } => ErrorKind::Internal,
            },
            Self::Configuration { .. } => ErrorKind::Validation,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in modforge".into(),
                "Please report it with the output of 'modforge -vvv'".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Resolution => ErrorCategory::Resolution,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Resolution,
    Workspace,
    NotFound,
    Internal,
}

/// Convenient result type alias.
pub type ModforgeResult<T> = Result<T, ModforgeError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        let key: ModforgeError = DomainError::ConfigKey {
            key: "platforms".into(),
            expected: "list",
            found: "string",
        }
        .into();
        assert_eq!(key.kind(), ErrorKind::ConfigKey);
        assert_eq!(key.category(), ErrorCategory::Configuration);

        let corrupt: ModforgeError = ApplicationError::WorkspaceCorruption {
            path: PathBuf::from("/w/M.modworkspace"),
            reason: "bad".into(),
        }
        .into();
        assert_eq!(corrupt.kind(), ErrorKind::WorkspaceCorruption);

        let missing: ModforgeError = ApplicationError::TemplateNotFound {
            name: "Nope".into(),
            known: vec!["Package.swift".into()],
        }
        .into();
        assert_eq!(missing.kind(), ErrorKind::TemplateNotFound);
        assert!(missing.suggestions().iter().any(|s| s.contains("Package.swift")));
    }

    #[test]
    fn setup_errors_are_not_parse_errors() {
        let err = ModforgeError::Configuration {
            message: "built-in defaults cannot be modified".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn errors_name_the_resource() {
        let err: ModforgeError = ApplicationError::ConfigParse {
            source_path: PathBuf::from("/home/u/.modforge.toml"),
            reason: "expected '='".into(),
        }
        .into();
        assert!(err.to_string().contains("/home/u/.modforge.toml"));
    }
}
