//! Generation Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Validate the module configuration
//! 2. Assemble the template context
//! 3. Render every template of the module kind into a module tree
//! 4. Write the tree with rollback on failure
//! 5. Resolve package dependencies (unless configured off)
//! 6. Register the package in a workspace (when one is given)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, PackageToolchain, TemplateRenderer},
        services::{ModuleConfigurationAssembler, WorkspaceRegistry},
    },
    domain::{
        DomainValidator as validator, MergedConfiguration, ModuleConfiguration, ModuleKind,
        ModuleTree, keys, normalize,
    },
    error::ModforgeResult,
};

/// Caller choices for one generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Replace an existing directory at the target path.
    pub force: bool,
    /// Container to register the new package in. Overrides
    /// `registerInWorkspace` from configuration.
    pub workspace: Option<PathBuf>,
}

/// What happened to the package resolution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Skipped,
    Resolved,
    Failed(String),
}

/// Summary of a completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub resolution: ResolutionOutcome,
    /// Container path and whether it changed.
    pub workspace: Option<(PathBuf, bool)>,
}

/// Template names and output paths for a module of `kind` named `name`.
pub fn module_layout(kind: ModuleKind, name: &str) -> Vec<(&'static str, PathBuf)> {
    let interface = format!("{name}Interface");
    let tests = format!("{name}Tests");

    let mut layout = vec![
        ("Package.swift", PathBuf::from("Package.swift")),
        ("README.md", PathBuf::from("README.md")),
        ("gitignore", PathBuf::from(".gitignore")),
        (
            "Module.swift",
            PathBuf::from(format!("Sources/{name}/{name}.swift")),
        ),
        (
            "Interface.swift",
            PathBuf::from(format!("Sources/{interface}/{interface}.swift")),
        ),
        (
            "Tests.swift",
            PathBuf::from(format!("Tests/{tests}/{tests}.swift")),
        ),
    ];
    if kind.has_example_app() {
        layout.push((
            "ExampleApp.swift",
            PathBuf::from(format!("Example/{name}Example/{name}ExampleApp.swift")),
        ));
    }
    layout
}

pub struct GenerationService {
    filesystem: Arc<dyn Filesystem>,
    renderer: Arc<dyn TemplateRenderer>,
    toolchain: Arc<dyn PackageToolchain>,
    assembler: ModuleConfigurationAssembler,
    registry: WorkspaceRegistry,
}

impl GenerationService {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        renderer: Arc<dyn TemplateRenderer>,
        toolchain: Arc<dyn PackageToolchain>,
        assembler: ModuleConfigurationAssembler,
        registry: WorkspaceRegistry,
    ) -> Self {
        Self {
            filesystem,
            renderer,
            toolchain,
            assembler,
            registry,
        }
    }

    /// Template names the renderer knows, sorted.
    pub fn template_names(&self) -> Vec<String> {
        let mut names = self.renderer.template_names();
        names.sort();
        names
    }

    /// Render the module without touching the filesystem.
    #[instrument(skip_all, fields(module = module.name(), kind = %module.kind()))]
    pub fn preview(
        &self,
        module: &ModuleConfiguration,
        config: &MergedConfiguration,
    ) -> ModforgeResult<ModuleTree> {
        validator::validate_module(module)?;
        let context = self.assembler.assemble(module, config)?;

        let mut tree = ModuleTree::new(module.target_path());
        for (template, path) in module_layout(module.kind(), module.name()) {
            let content = self.renderer.render(template, &context)?;
            tree.add_file(path, content);
        }

        validator::validate_module_tree(&tree, module.name())?;
        Ok(tree)
    }

    /// Generate the module on disk.
    #[instrument(
        skip_all,
        fields(
            module = module.name(),
            kind = %module.kind(),
            target = %module.target_path().display()
        )
    )]
    pub fn generate(
        &self,
        module: &ModuleConfiguration,
        config: &MergedConfiguration,
        options: &GenerationOptions,
    ) -> ModforgeResult<GenerationReport> {
        info!("Generating {} module {}", module.kind(), module.name());

        let tree = self.preview(module, config)?;
        self.write_tree(&tree, options.force)?;

        let resolution = if config.get_bool(keys::SKIP_DEPENDENCY_RESOLVER)?.unwrap_or(false) {
            info!("Package resolution skipped by configuration");
            ResolutionOutcome::Skipped
        } else {
            match self.toolchain.resolve(tree.root()) {
                Ok(()) => ResolutionOutcome::Resolved,
                Err(e) => {
                    warn!(error = %e, "Package resolution failed, module kept");
                    ResolutionOutcome::Failed(e.to_string())
                }
            }
        };

        let workspace = match self.workspace_for(module, config, options)? {
            Some(container) => {
                let changed = self.registry.add_package(tree.root(), &container)?;
                Some((container, changed))
            }
            None => None,
        };

        info!(files = tree.file_count(), "Generation completed successfully");
        Ok(GenerationReport {
            root: tree.root().to_path_buf(),
            files: tree.files().map(|f| f.path.clone()).collect(),
            resolution,
            workspace,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Explicit option first, then configuration. A relative configured path
    /// is taken relative to the directory the module is created in.
    fn workspace_for(
        &self,
        module: &ModuleConfiguration,
        config: &MergedConfiguration,
        options: &GenerationOptions,
    ) -> ModforgeResult<Option<PathBuf>> {
        if let Some(explicit) = &options.workspace {
            return Ok(Some(explicit.clone()));
        }

        let Some(configured) = config.get_non_empty_str(keys::REGISTER_IN_WORKSPACE)? else {
            return Ok(None);
        };
        let configured = Path::new(configured);
        if configured.is_absolute() {
            return Ok(Some(configured.to_path_buf()));
        }
        let base = module.target_path().parent().unwrap_or(module.target_path());
        Ok(Some(normalize(&base.join(configured))))
    }

    /// Write module tree to filesystem with rollback on failure.
    fn write_tree(&self, tree: &ModuleTree, force: bool) -> ModforgeResult<()> {
        if self.filesystem.exists(tree.root()) {
            if !force {
                return Err(ApplicationError::ProjectExists {
                    path: tree.root().to_path_buf(),
                }
                .into());
            }
            warn!(path = %tree.root().display(), "Replacing existing module directory");
            self.filesystem.remove_dir_all(tree.root())?;
        }

        match self.write_all(tree) {
            Ok(()) => {
                info!("Successfully wrote all files");
                Ok(())
            }
            Err(e) => {
                warn!("Write failed, attempting rollback");
                self.rollback(tree.root());
                Err(e)
            }
        }
    }

    fn write_all(&self, tree: &ModuleTree) -> ModforgeResult<()> {
        self.filesystem.create_dir_all(tree.root())?;

        for dir in tree.directories() {
            self.filesystem.create_dir_all(&tree.root().join(dir))?;
        }

        for file in tree.files() {
            let path = tree.root().join(&file.path);
            self.filesystem.write_file(&path, &file.content)?;
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::application::{
        ports::{
            MockClock, MockDocumentCodec, MockFilesystem, MockPackageToolchain, MockProductCatalog,
            MockTemplateRenderer,
        },
        services::DependencyResolver,
    };
    use crate::error::ErrorKind;

    fn renderer() -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(|name, ctx| Ok(format!("{name} for {}", ctx.get_text("name").unwrap_or_default())));
        renderer
    }

    fn service(fs: MockFilesystem, toolchain: MockPackageToolchain) -> GenerationService {
        let fs: Arc<dyn Filesystem> = Arc::new(fs);
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .return_const(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let assembler = ModuleConfigurationAssembler::new(
            DependencyResolver::new(fs.clone(), Arc::new(MockProductCatalog::new())),
            Arc::new(clock),
        );
        let registry = WorkspaceRegistry::new(fs.clone(), Arc::new(MockDocumentCodec::new()));
        GenerationService::new(fs, Arc::new(renderer()), Arc::new(toolchain), assembler, registry)
    }

    fn module(kind: ModuleKind) -> ModuleConfiguration {
        ModuleConfiguration::builder("Login", kind)
            .target_path("/work/Login")
            .build()
            .unwrap()
    }

    fn writable_fs(root_exists: bool) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(root_exists);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs
    }

    #[test]
    fn layout_adds_example_app_for_microapps() {
        let feature = module_layout(ModuleKind::Feature, "Login");
        let micro = module_layout(ModuleKind::MicroApp, "Login");
        assert_eq!(micro.len(), feature.len() + 1);
        assert!(micro.iter().any(|(_, p)| p == Path::new("Example/LoginExample/LoginExampleApp.swift")));
        assert!(feature.iter().any(|(_, p)| p == Path::new("Sources/LoginInterface/LoginInterface.swift")));
    }

    #[test]
    fn preview_renders_every_template() {
        let tree = service(MockFilesystem::new(), MockPackageToolchain::new())
            .preview(&module(ModuleKind::Core), &MergedConfiguration::defaults())
            .unwrap();

        assert_eq!(tree.file_count(), 6);
        assert_eq!(
            tree.file("Package.swift").map(|f| f.content.as_str()),
            Some("Package.swift for Login")
        );
    }

    #[test]
    fn existing_target_is_refused_without_force() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_write_file().never();

        let err = service(fs, MockPackageToolchain::new())
            .generate(
                &module(ModuleKind::Feature),
                &MergedConfiguration::defaults(),
                &GenerationOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn failed_write_rolls_back() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| {
            Err(ApplicationError::FilesystemError {
                path: p.to_path_buf(),
                reason: "disk full".into(),
            }
            .into())
        });
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new("/work/Login"))
            .times(1)
            .returning(|_| Ok(()));

        let err = service(fs, MockPackageToolchain::new())
            .generate(
                &module(ModuleKind::Feature),
                &MergedConfiguration::defaults(),
                &GenerationOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn resolver_runs_unless_skipped() {
        let mut toolchain = MockPackageToolchain::new();
        toolchain.expect_resolve().times(1).returning(|_| Ok(()));

        let report = service(writable_fs(false), toolchain)
            .generate(
                &module(ModuleKind::Feature),
                &MergedConfiguration::defaults(),
                &GenerationOptions::default(),
            )
            .unwrap();
        assert_eq!(report.resolution, ResolutionOutcome::Resolved);
        assert!(report.workspace.is_none());
    }

    #[test]
    fn skip_dependency_resolver_is_honored() {
        let mut toolchain = MockPackageToolchain::new();
        toolchain.expect_resolve().never();

        let config = MergedConfiguration::defaults().with_layer(
            crate::domain::ConfigurationLayer::empty(crate::domain::LayerKind::Project)
                .with_value("skipDependencyResolver", true.into())
                .unwrap(),
        );
        let report = service(writable_fs(false), toolchain)
            .generate(&module(ModuleKind::Shared), &config, &GenerationOptions::default())
            .unwrap();
        assert_eq!(report.resolution, ResolutionOutcome::Skipped);
    }

    #[test]
    fn toolchain_failure_keeps_the_module() {
        let mut toolchain = MockPackageToolchain::new();
        toolchain.expect_resolve().returning(|p| {
            Err(ApplicationError::ToolchainFailed {
                path: p.to_path_buf(),
                reason: "swift not found".into(),
            }
            .into())
        });
        let mut fs = writable_fs(false);
        fs.expect_remove_dir_all().never();

        let report = service(fs, toolchain)
            .generate(
                &module(ModuleKind::Feature),
                &MergedConfiguration::defaults(),
                &GenerationOptions::default(),
            )
            .unwrap();
        assert!(matches!(report.resolution, ResolutionOutcome::Failed(_)));
        assert_eq!(report.files.len(), 6);
    }
}
