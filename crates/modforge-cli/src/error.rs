//! CLI-level errors and their translation into stderr reports and exit codes.
//!
//! Core errors arrive wrapped in [`CliError::Core`] and keep their own
//! suggestions; the remaining variants are failures only the CLI can detect.

use std::error::Error as _;
use std::path::PathBuf;

use owo_colors::{OwoColorize, Style};
use thiserror::Error;

use modforge_core::{
    application::ApplicationError,
    domain::DomainError,
    error::{ErrorCategory as CoreCategory, ModforgeError},
};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// An argument clap accepted but modforge cannot interpret.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// `workspace validate` found a structural defect.
    #[error("Workspace {} is invalid: {reason}", path.display())]
    InvalidWorkspace { path: PathBuf, reason: String },

    /// `config get` on a key no layer defines.
    #[error("Configuration key '{key}' is not set")]
    UnknownKey { key: String },

    /// A settings file location could not be determined or loaded.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Core(#[from] ModforgeError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The confirmation prompt was declined.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        CliError::Core(err.into())
    }
}

impl From<ApplicationError> for CliError {
    fn from(err: ApplicationError) -> Self {
        CliError::Core(err.into())
    }
}

impl CliError {
    /// Shorthand for an input error without a source.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    /// Next steps printed under the error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Rejected value: {message}"),
                "See `modforge <COMMAND> --help` for the accepted forms".into(),
            ],

            Self::InvalidWorkspace { path, .. } => vec![
                format!("Open {} and fix the member entry", path.display()),
                "Each [[members]] entry needs a name and a path".into(),
            ],

            Self::UnknownKey { key } => vec![
                format!("'{key}' is not defined in any configuration layer"),
                "List effective settings: modforge config list".into(),
                format!("Set it: modforge config set {key} <VALUE>"),
            ],

            Self::ConfigError { message, .. } => vec![
                "Check the TOML syntax of the file named above".into(),
                "Show configuration locations: modforge config path".into(),
                "Create a starter file: modforge init".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("Underlying I/O error: {message}"),
                "Check that the destination is writable".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::InvalidWorkspace { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::UnknownKey { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Core(core) => core.category().into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    /// Multi-line report for stderr.
    ///
    /// `verbose` adds the `source()` chain and drops the hint about `-v`.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: Style| {
            if color {
                text.style(style).to_string()
            } else {
                text.to_owned()
            }
        };

        let mut lines = vec![
            String::new(),
            format!(
                "{} {}",
                paint("\u{2717} Error:", Style::new().red().bold()),
                paint(&self.to_string(), Style::new().red())
            ),
        ];

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                lines.push(paint(&format!("  Caused by: {err}"), Style::new().dimmed()));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            lines.push(String::new());
            lines.push(paint("Suggestions:", Style::new().yellow().bold()));
            lines.extend(suggestions.iter().map(|s| format!("  - {s}")));
        }

        if !verbose {
            lines.push(String::new());
            lines.push(paint(
                "Run again with -v / --verbose to see the underlying cause.",
                Style::new().dimmed(),
            ));
        }

        let mut report = lines.join("\n");
        report.push('\n');
        report
    }

    pub fn log(&self) {
        let category = self.category();
        let code = category.exit_code();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, code, "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, code, "{self}")
            }
        }
        if let Some(source) = self.source() {
            tracing::debug!(%source, "underlying cause");
        }
    }
}

/// Exit-status classes of the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

impl ErrorCategory {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCategory::Internal => 1,
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
        }
    }
}

impl From<CoreCategory> for ErrorCategory {
    fn from(category: CoreCategory) -> Self {
        match category {
            CoreCategory::Validation | CoreCategory::Resolution | CoreCategory::Workspace => {
                ErrorCategory::UserError
            }
            CoreCategory::NotFound => ErrorCategory::NotFound,
            CoreCategory::Configuration => ErrorCategory::Configuration,
            CoreCategory::Internal => ErrorCategory::Internal,
        }
    }
}
