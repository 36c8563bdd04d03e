//! Command handlers.
//!
//! Each handler translates parsed arguments into core service calls and
//! renders the result. Adapter wiring lives in [`Services`] so that every
//! command sees the same filesystem, codec and catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use modforge_adapters::{
    FilesystemTemplateLoader, LocalFilesystem, ManifestProductCatalog, SimpleRenderer,
    SwiftToolchain, SystemClock, TomlCodec,
};
use modforge_core::prelude::*;
use tracing::debug;

use crate::{config::AppConfig, error::CliResult};

pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod templates;
pub mod workspace;

/// Production adapters shared by the command handlers.
pub struct Services {
    pub filesystem: Arc<dyn Filesystem>,
    pub codec: Arc<dyn DocumentCodec>,
    pub catalog: Arc<dyn ProductCatalog>,
}

impl Services {
    pub fn local() -> Self {
        let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
        Self {
            catalog: Arc::new(ManifestProductCatalog::new(filesystem.clone())),
            codec: Arc::new(TomlCodec::new()),
            filesystem,
        }
    }

    /// Store with every configured layer loaded.
    pub fn store(&self, config: &AppConfig) -> CliResult<ConfigurationStore> {
        let mut store = self.empty_store();
        store.load(&config.search_paths())?;
        Ok(store)
    }

    /// Store holding only the built-in defaults.
    pub fn empty_store(&self) -> ConfigurationStore {
        ConfigurationStore::new(self.filesystem.clone(), self.codec.clone())
    }

    pub fn registry(&self) -> WorkspaceRegistry {
        WorkspaceRegistry::new(self.filesystem.clone(), self.codec.clone())
    }

    pub fn resolver(&self) -> DependencyResolver {
        DependencyResolver::new(self.filesystem.clone(), self.catalog.clone())
    }

    /// Templates found under `--templates-dir`, keyed by name.
    pub fn template_overrides(&self, config: &AppConfig) -> CliResult<BTreeMap<String, String>> {
        let Some(dir) = &config.templates_dir else {
            return Ok(BTreeMap::new());
        };
        let overrides = FilesystemTemplateLoader::new(dir).load_all()?;
        debug!(count = overrides.len(), dir = %dir.display(), "Template overrides loaded");
        Ok(overrides)
    }

    /// Built-in templates with any overrides on top.
    pub fn renderer(&self, config: &AppConfig) -> CliResult<SimpleRenderer> {
        Ok(SimpleRenderer::new().with_templates(self.template_overrides(config)?))
    }

    pub fn generation(&self, config: &AppConfig) -> CliResult<GenerationService> {
        let assembler = ModuleConfigurationAssembler::new(self.resolver(), Arc::new(SystemClock));
        Ok(GenerationService::new(
            self.filesystem.clone(),
            Arc::new(self.renderer(config)?),
            Arc::new(SwiftToolchain::new()),
            assembler,
            self.registry(),
        ))
    }
}
