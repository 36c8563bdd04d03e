//! Dependency resolver - turns declared dependencies into manifest entries.
//!
//! Output order is fixed: local dependencies in declaration order, then
//! remote dependencies in declaration order, and on the target side a single
//! interface reference appended last.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::ports::{Filesystem, ProductCatalog},
    domain::{
        DomainError, DomainValidator as validator, LocalDependency, PackageDeclaration,
        RelativePath, RemoteDependency, ResolvedDependencies, TargetDeclaration, interface_name,
        paths,
    },
    error::ModforgeResult,
};

pub struct DependencyResolver {
    filesystem: Arc<dyn Filesystem>,
    catalog: Arc<dyn ProductCatalog>,
}

impl DependencyResolver {
    pub fn new(filesystem: Arc<dyn Filesystem>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            filesystem,
            catalog,
        }
    }

    /// Describe the local package at `path`.
    ///
    /// The package name is the last path segment and the available products
    /// come from the product catalog. `exposed` defaults to every available
    /// product.
    pub fn local_dependency(
        &self,
        path: &Path,
        exposed: Option<Vec<String>>,
    ) -> ModforgeResult<LocalDependency> {
        let name = paths::file_name(path).ok_or_else(|| DomainError::DependencyResolution {
            dependency: path.display().to_string(),
            reason: "path has no final segment to name the package".into(),
        })?;
        self.check_reachable(&name, path)?;

        let available = self.catalog.available_products(path).map_err(|e| {
            DomainError::DependencyResolution {
                dependency: name.clone(),
                reason: e.to_string(),
            }
        })?;
        let exposed = exposed.unwrap_or_else(|| available.clone());
        Ok(LocalDependency::new(name, path, exposed, available))
    }

    /// Resolve the dependencies of the module rooted at `module_path`.
    #[instrument(skip_all, fields(module = module_name, locals = locals.len(), remotes = remotes.len()))]
    pub fn resolve(
        &self,
        module_path: &Path,
        module_name: &str,
        locals: &[LocalDependency],
        remotes: &[RemoteDependency],
    ) -> ModforgeResult<ResolvedDependencies> {
        let mut resolved = ResolvedDependencies::default();
        let mut seen = HashSet::new();

        for dep in locals {
            if !seen.insert(dep.name().to_string()) {
                debug!(dependency = dep.name(), "Duplicate local dependency ignored");
                continue;
            }

            let relative = self.locate(module_path, dep)?;
            validator::validate_local_dependency(dep)?;

            resolved.package.push(PackageDeclaration::Path {
                name: dep.name().to_string(),
                path: relative,
            });
            resolved
                .target
                .extend(dep.exposed().iter().map(|product| TargetDeclaration::Product {
                    name: product.clone(),
                    package: dep.name().to_string(),
                }));
        }

        let mut remote_seen = HashSet::new();
        for dep in remotes {
            if !remote_seen.insert(dep.name()) {
                debug!(dependency = dep.name(), "Duplicate remote dependency ignored");
                continue;
            }
            resolved.package.push(PackageDeclaration::Remote {
                name: dep.name().to_string(),
                locator: dep.locator().to_string(),
                constraint: dep.constraint().to_string(),
            });
            resolved
                .target
                .push(TargetDeclaration::Named(dep.name().to_string()));
        }

        resolved
            .target
            .push(TargetDeclaration::Interface(interface_name(module_name)));

        debug!(
            package = resolved.package.len(),
            target = resolved.target.len(),
            "Dependencies resolved"
        );
        Ok(resolved)
    }

    /// Path of `dep` relative to the module directory.
    fn locate(&self, module_path: &Path, dep: &LocalDependency) -> ModforgeResult<RelativePath> {
        self.check_reachable(dep.name(), dep.path())?;
        paths::relative_path(module_path, dep.path()).map_err(|e| {
            DomainError::DependencyResolution {
                dependency: dep.name().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// A local package path must be absolute and present on disk.
    fn check_reachable(&self, name: &str, path: &Path) -> Result<(), DomainError> {
        let fail = |reason: String| DomainError::DependencyResolution {
            dependency: name.to_string(),
            reason,
        };
        if !path.is_absolute() {
            return Err(fail(format!("path '{}' is not absolute", path.display())));
        }
        if !self.filesystem.exists(path) {
            return Err(fail(format!("path '{}' does not exist", path.display())));
        }
        Ok(())
    }
}
