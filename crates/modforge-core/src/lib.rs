//! Domain model and use cases of modforge.
//!
//! `domain` holds the pure types: configuration layers and their merge,
//! local and remote package dependencies, module configurations, the
//! generated file tree and workspace containers. `application` holds the
//! services that drive them (settings store, dependency resolver, template
//! context assembly, generation, workspace registry) together with the port
//! traits that `modforge-adapters` implements. Nothing here touches the disk
//! or spawns processes directly.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use modforge_core::prelude::*;
//!
//! # fn run(fs: Arc<dyn Filesystem>, codec: Arc<dyn DocumentCodec>) -> ModforgeResult<()> {
//! let mut store = ConfigurationStore::new(fs.clone(), codec.clone());
//! store.load(&ConfigSearchPaths::new(None, Some(".modforge.toml".into())))?;
//!
//! let registry = WorkspaceRegistry::new(fs, codec);
//! let container = registry.create_workspace("/work".as_ref(), "Modules")?;
//! registry.add_package("/work/Login".as_ref(), &container)?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

/// Everything the CLI needs in one import.
pub mod prelude {
    pub use crate::application::{
        ConfigSearchPaths, ConfigurationStore, DependencyResolver, GenerationOptions,
        GenerationReport, GenerationService, ModuleConfigurationAssembler, ResolutionOutcome,
        WorkspaceRegistry,
        ports::{Clock, DocumentCodec, Filesystem, PackageToolchain, ProductCatalog, TemplateRenderer},
    };
    pub use crate::domain::{
        ConfigurationLayer, LayerKind, LocalDependency, MemberPackage, MergedConfiguration,
        ModuleConfiguration, ModuleKind, ModuleTree, PackageKind, Platform, RemoteDependency,
        TemplateContext, Value, ValueMap, WorkspaceContainer, WorkspaceValidation,
    };
    pub use crate::error::{ErrorKind, ModforgeError, ModforgeResult};
}
