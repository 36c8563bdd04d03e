//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `modforge-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::{TemplateContext, ValueMap};
use crate::error::ModforgeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `modforge_adapters::filesystem::LocalFilesystem` (production)
/// - `modforge_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Failures are reported as `ApplicationError::FilesystemError` naming the
/// path involved; services translate them into their own error kinds.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ModforgeResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> ModforgeResult<()>;

    /// Replace a file through a sibling temporary file and a rename.
    ///
    /// Either the old content or the new content is visible afterwards,
    /// never a partial write.
    fn write_atomic(&self, path: &Path, content: &str) -> ModforgeResult<()>;

    fn read_to_string(&self, path: &Path) -> ModforgeResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Absolute path with symlinks and `.`/`..` resolved. Fails when the path
    /// does not exist.
    fn canonicalize(&self, path: &Path) -> ModforgeResult<PathBuf>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ModforgeResult<()>;
}

/// Port for the structured document format used by configuration files and
/// workspace containers.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentCodec: Send + Sync {
    /// Decode a document whose root is a table. Errors carry a
    /// human-readable reason.
    fn decode(&self, text: &str) -> Result<ValueMap, String>;

    fn encode(&self, document: &ValueMap) -> Result<String, String>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `modforge_adapters::renderer::SimpleRenderer` (built-in templates)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render the named template against `context`.
    ///
    /// Unknown names fail with `ApplicationError::TemplateNotFound` listing
    /// the names the renderer does know.
    fn render(&self, template_name: &str, context: &TemplateContext) -> ModforgeResult<String>;

    fn template_names(&self) -> Vec<String>;
}

/// Source of the current time. The only clock the core reads.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Lists the products a local package offers.
#[cfg_attr(test, mockall::automock)]
pub trait ProductCatalog: Send + Sync {
    fn available_products(&self, package_path: &Path) -> ModforgeResult<Vec<String>>;
}

/// External package tool run after a module is written.
#[cfg_attr(test, mockall::automock)]
pub trait PackageToolchain: Send + Sync {
    /// Fetch and pin the dependencies of the package at `package_path`.
    fn resolve(&self, package_path: &Path) -> ModforgeResult<()>;
}
