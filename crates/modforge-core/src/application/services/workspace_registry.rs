//! Workspace registry - the persisted member list of a workspace container.
//!
//! Every mutation is load, change, save. Saves go through the filesystem's
//! atomic write so a crash never leaves a half-written container. Adding a
//! member that is already present, or removing one that is absent, is a
//! successful no-op that leaves the file untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{DocumentCodec, Filesystem},
    },
    domain::{
        DomainError, DomainValidator as validator, MemberPackage, PackageKind, Value,
        WorkspaceContainer, WorkspaceValidation, entities::workspace::inspect_document,
        normalize, paths,
    },
    error::{ModforgeError, ModforgeResult},
};

pub struct WorkspaceRegistry {
    filesystem: Arc<dyn Filesystem>,
    codec: Arc<dyn DocumentCodec>,
}

impl WorkspaceRegistry {
    pub fn new(filesystem: Arc<dyn Filesystem>, codec: Arc<dyn DocumentCodec>) -> Self {
        Self { filesystem, codec }
    }

    /// Create an empty container `<at>/<name>.modworkspace`.
    #[instrument(skip_all, fields(at = %at.display(), name = name))]
    pub fn create_workspace(&self, at: &Path, name: &str) -> ModforgeResult<PathBuf> {
        if name.trim().is_empty() || name.contains(['/', '\\']) {
            return Err(DomainError::InvalidModule(format!(
                "workspace name '{name}' must be a non-empty file name"
            ))
            .into());
        }

        let path = WorkspaceContainer::location(at, name);
        if self.filesystem.exists(&path) {
            return Err(ApplicationError::WorkspaceIo {
                path,
                reason: "a workspace container already exists here".into(),
            }
            .into());
        }

        self.filesystem
            .create_dir_all(at)
            .map_err(|e| workspace_io(&path, e))?;
        let directory = self
            .filesystem
            .canonicalize(at)
            .map_err(|e| workspace_io(&path, e))?;
        let container = WorkspaceContainer::new(WorkspaceContainer::location(&directory, name), name);
        self.save(&container)?;

        info!(path = %container.path().display(), "Workspace created");
        Ok(container.path().to_path_buf())
    }

    /// Register the package at `package_path`. Returns whether the container
    /// changed.
    #[instrument(skip_all, fields(package = %package_path.display(), workspace = %workspace_path.display()))]
    pub fn add_package(&self, package_path: &Path, workspace_path: &Path) -> ModforgeResult<bool> {
        let mut container = self.load(workspace_path)?;
        let canonical = self
            .filesystem
            .canonicalize(package_path)
            .map_err(|e| workspace_io(package_path, e))?;

        if container.contains(&canonical) {
            debug!("Package already registered");
            return Ok(false);
        }

        let name = paths::file_name(&canonical).ok_or_else(|| ApplicationError::WorkspaceIo {
            path: canonical.clone(),
            reason: "package path has no final segment to name the member".into(),
        })?;
        let kind = PackageKind::infer(
            self.filesystem
                .is_file(&canonical.join(PackageKind::MANIFEST_FILE)),
        );

        container.add(MemberPackage::new(name, canonical, kind));
        self.save(&container)?;

        info!(members = container.members().len(), "Package added to workspace");
        Ok(true)
    }

    /// Unregister the package at `package_path`. Returns whether the
    /// container changed.
    #[instrument(skip_all, fields(package = %package_path.display(), workspace = %workspace_path.display()))]
    pub fn remove_package(
        &self,
        package_path: &Path,
        workspace_path: &Path,
    ) -> ModforgeResult<bool> {
        let mut container = self.load(workspace_path)?;

        // A package directory may already be gone; fall back to its lexical form.
        let canonical = self
            .filesystem
            .canonicalize(package_path)
            .unwrap_or_else(|_| normalize(package_path));

        if !container.remove(&canonical) {
            debug!("Package not registered");
            return Ok(false);
        }

        self.save(&container)?;
        info!(members = container.members().len(), "Package removed from workspace");
        Ok(true)
    }

    /// Members in insertion order.
    pub fn list_packages(&self, workspace_path: &Path) -> ModforgeResult<Vec<MemberPackage>> {
        Ok(self.load(workspace_path)?.members().to_vec())
    }

    /// Structural check of the container at `workspace_path`.
    ///
    /// Defects inside a readable document are reported as
    /// [`WorkspaceValidation::Invalid`]; a file that cannot be read or decoded
    /// is an error.
    pub fn validate_workspace(&self, workspace_path: &Path) -> ModforgeResult<WorkspaceValidation> {
        let (path, document) = self.read_document(workspace_path)?;
        let directory = path.parent().unwrap_or_else(|| Path::new("/"));
        Ok(inspect_document(directory, &document))
    }

    /// Load and decode a container.
    pub fn load(&self, workspace_path: &Path) -> ModforgeResult<WorkspaceContainer> {
        let (path, document) = self.read_document(workspace_path)?;
        WorkspaceContainer::from_document(&path, &document)
            .map_err(|reason| ApplicationError::WorkspaceCorruption { path, reason }.into())
    }

    fn save(&self, container: &WorkspaceContainer) -> ModforgeResult<()> {
        validator::validate_workspace(container)?;

        let document = container.to_document()?;
        let text = self
            .codec
            .encode(&document)
            .map_err(|reason| ApplicationError::WorkspaceIo {
                path: container.path().to_path_buf(),
                reason,
            })?;

        self.filesystem
            .write_atomic(container.path(), &text)
            .map_err(|e| workspace_io(container.path(), e))
    }

    /// Canonical container path and its decoded document.
    fn read_document(&self, workspace_path: &Path) -> ModforgeResult<(PathBuf, Value)> {
        if !self.filesystem.exists(workspace_path) {
            return Err(ApplicationError::WorkspaceIo {
                path: workspace_path.to_path_buf(),
                reason: "no workspace container at this path".into(),
            }
            .into());
        }

        let corrupt = |path: &Path, reason: String| ApplicationError::WorkspaceCorruption {
            path: path.to_path_buf(),
            reason,
        };

        let path = self
            .filesystem
            .canonicalize(workspace_path)
            .map_err(|e| workspace_io(workspace_path, e))?;
        let text = self
            .filesystem
            .read_to_string(&path)
            .map_err(|e| corrupt(&path, format!("unreadable: {e}")))?;
        let document = self
            .codec
            .decode(&text)
            .map_err(|reason| corrupt(&path, reason))?;

        Ok((path, Value::Map(document)))
    }
}

/// Re-label a filesystem failure as a workspace I/O failure on `path`.
fn workspace_io(path: &Path, err: ModforgeError) -> ModforgeError {
    match err {
        ModforgeError::Application(ApplicationError::FilesystemError { reason, .. }) => {
            ApplicationError::WorkspaceIo {
                path: path.to_path_buf(),
                reason,
            }
            .into()
        }
        other => other,
    }
}
