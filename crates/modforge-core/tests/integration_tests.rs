//! Integration tests for modforge-core wired to the in-memory adapters.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use modforge_adapters::{
    FixedClock, ManifestProductCatalog, MemoryFilesystem, NoopToolchain, SimpleRenderer, TomlCodec,
};
use modforge_core::{domain::keys, prelude::*};

const CORE_MANIFEST: &str = r#"// swift-tools-version:5.9
import PackageDescription

let package = Package(
    name: "Awesome",
    products: [
        .library(name: "AwesomeKit", targets: ["AwesomeKit"]),
    ]
)
"#;

struct Harness {
    fs: MemoryFilesystem,
    store: ConfigurationStore,
    registry: WorkspaceRegistry,
    generation: GenerationService,
}

fn harness(fs: MemoryFilesystem) -> Harness {
    let shared: Arc<dyn Filesystem> = Arc::new(fs.clone());
    let codec: Arc<dyn DocumentCodec> = Arc::new(TomlCodec::new());

    let resolver = DependencyResolver::new(
        shared.clone(),
        Arc::new(ManifestProductCatalog::new(shared.clone())),
    );
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap());
    let assembler = ModuleConfigurationAssembler::new(resolver, Arc::new(clock));

    Harness {
        fs,
        store: ConfigurationStore::new(shared.clone(), codec.clone()),
        registry: WorkspaceRegistry::new(shared.clone(), codec.clone()),
        generation: GenerationService::new(
            shared.clone(),
            Arc::new(SimpleRenderer::new()),
            Arc::new(NoopToolchain),
            assembler,
            WorkspaceRegistry::new(shared, codec),
        ),
    }
}

// ── Configuration ────────────────────────────────────────────────────────────

#[test]
fn higher_layer_wins_on_load() {
    let fs = MemoryFilesystem::new()
        .with_file("/home/.config/modforge/config.toml", "skipDependencyResolver = false\n")
        .with_file("/work/.modforge.toml", "skipDependencyResolver = true\n");
    let mut h = harness(fs);

    let merged = h
        .store
        .load(&ConfigSearchPaths::new(
            Some("/home/.config/modforge/config.toml".into()),
            Some("/work/.modforge.toml".into()),
        ))
        .unwrap();

    assert_eq!(merged.get_bool(keys::SKIP_DEPENDENCY_RESOLVER).unwrap(), Some(true));
    assert_eq!(merged.origin(keys::SKIP_DEPENDENCY_RESOLVER), Some(LayerKind::Project));
}

#[test]
fn comma_separated_exclusions_become_a_list_and_persist() {
    let mut h = harness(MemoryFilesystem::new().with_dir("/work"));
    let project = PathBuf::from("/work/.modforge.toml");

    let stored = h
        .store
        .set_raw(keys::DEPENDENCY_EXCLUSIONS, "PackageA, PackageB", LayerKind::Project)
        .unwrap();
    assert_eq!(stored, Value::string_list(["PackageA", "PackageB"]));

    h.store.save(LayerKind::Project, &project).unwrap();

    let mut reloaded = harness(h.fs.clone());
    let merged = reloaded
        .store
        .load(&ConfigSearchPaths::new(None, Some(project)))
        .unwrap();
    assert_eq!(
        merged.get_string_list(keys::DEPENDENCY_EXCLUSIONS).unwrap(),
        Some(vec!["PackageA".to_string(), "PackageB".to_string()])
    );
}

#[test]
fn failed_config_save_keeps_the_stored_file() {
    let mut h = harness(MemoryFilesystem::new().with_dir("/work"));
    let project = PathBuf::from("/work/.modforge.toml");

    h.store.set("author", Value::from("Ada"), LayerKind::Project).unwrap();
    h.store.save(LayerKind::Project, &project).unwrap();
    let persisted = h.fs.read_file(&project).unwrap();

    h.fs.deny_writes("/work");
    h.store.set("author", Value::from("Grace"), LayerKind::Project).unwrap();
    assert!(h.store.save(LayerKind::Project, &project).is_err());

    assert_eq!(h.fs.read_file(&project).unwrap(), persisted);
    let mut reloaded = harness(h.fs.clone());
    reloaded
        .store
        .load(&ConfigSearchPaths::new(None, Some(project)))
        .unwrap();
    assert_eq!(reloaded.store.get("author"), Some(&Value::from("Ada")));
}

#[test]
fn malformed_config_file_names_its_path() {
    let fs = MemoryFilesystem::new().with_file("/work/.modforge.toml", "author = \n");
    let mut h = harness(fs);

    let err = h
        .store
        .load(&ConfigSearchPaths::new(None, Some("/work/.modforge.toml".into())))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigParse);
    assert!(err.to_string().contains("/work/.modforge.toml"));
}

// ── Workspace ────────────────────────────────────────────────────────────────

#[test]
fn workspace_add_list_remove_round() {
    let fs = MemoryFilesystem::new().with_file("/work/Feature/Package.swift", "");
    let h = harness(fs);

    let container = h.registry.create_workspace(Path::new("/work"), "Modules").unwrap();
    assert_eq!(container, PathBuf::from("/work/Modules.modworkspace"));
    let before = h.registry.list_packages(&container).unwrap().len();

    assert!(h.registry.add_package(Path::new("/work/Feature"), &container).unwrap());
    let members = h.registry.list_packages(&container).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name(), "Feature");

    // Adding again is a no-op.
    assert!(!h.registry.add_package(Path::new("/work/./Feature"), &container).unwrap());

    assert!(h.registry.remove_package(Path::new("/work/Feature"), &container).unwrap());
    assert_eq!(h.registry.list_packages(&container).unwrap().len(), before);
}

#[test]
fn container_stores_relative_member_paths() {
    let fs = MemoryFilesystem::new().with_file("/work/libs/Core/Package.swift", "");
    let h = harness(fs);

    let container = h.registry.create_workspace(Path::new("/work"), "Modules").unwrap();
    h.registry.add_package(Path::new("/work/libs/Core"), &container).unwrap();

    let text = h.fs.read_file(&container).unwrap();
    assert!(text.contains("libs/Core"), "stored document: {text}");
    assert!(!text.contains("/work/libs"), "stored document: {text}");
}

#[test]
fn failed_container_save_keeps_existing_members() {
    let fs = MemoryFilesystem::new()
        .with_file("/work/Feature/Package.swift", "")
        .with_file("/work/Kit/Package.swift", "");
    let h = harness(fs);

    let container = h.registry.create_workspace(Path::new("/work"), "Modules").unwrap();
    h.registry.add_package(Path::new("/work/Feature"), &container).unwrap();
    let persisted = h.fs.read_file(&container).unwrap();

    h.fs.deny_writes("/work");
    let err = h
        .registry
        .add_package(Path::new("/work/Kit"), &container)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WorkspaceIo);

    assert_eq!(h.fs.read_file(&container).unwrap(), persisted);
    let members = h.registry.list_packages(&container).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name(), "Feature");
}

#[test]
fn corrupt_container_is_reported_not_diagnosed() {
    let fs = MemoryFilesystem::new().with_file("/work/Broken.modworkspace", "members = [");
    let h = harness(fs);

    let err = h
        .registry
        .validate_workspace(Path::new("/work/Broken.modworkspace"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WorkspaceCorruption);
}

#[test]
fn structural_defects_are_diagnosed() {
    let fs = MemoryFilesystem::new().with_file(
        "/work/Modules.modworkspace",
        "name = \"Modules\"\n\n[[members]]\nname = \"Ghost\"\n",
    );
    let h = harness(fs);

    let result = h
        .registry
        .validate_workspace(Path::new("/work/Modules.modworkspace"))
        .unwrap();
    assert!(!result.is_valid());
}

// ── Generation ───────────────────────────────────────────────────────────────

#[test]
fn generates_feature_module_with_dependencies() {
    let fs = MemoryFilesystem::new().with_file("/work/Awesome/Package.swift", CORE_MANIFEST);
    let h = harness(fs);
    let config = MergedConfiguration::defaults();

    let awesome = h.local_dependency("/work/Awesome", ["AwesomeKit"]);
    let module = ModuleConfiguration::builder("Login", ModuleKind::Feature)
        .target_path("/work/Login")
        .author("Ada")
        .local(awesome)
        .remote(RemoteDependency::new(
            "Rainbow",
            "https://example.com/rainbow.git",
            "from: \"1.0.0\"",
        ))
        .build()
        .unwrap();

    let report = h
        .generation
        .generate(&module, &config, &GenerationOptions::default())
        .unwrap();

    assert_eq!(report.root, PathBuf::from("/work/Login"));
    assert_eq!(report.files.len(), 6);
    assert_eq!(report.resolution, ResolutionOutcome::Resolved);
    assert!(report.workspace.is_none());

    let manifest = h.fs.read_file(Path::new("/work/Login/Package.swift")).unwrap();
    let product = manifest
        .find(".product(name: \"AwesomeKit\", package: \"Awesome\")")
        .unwrap();
    let named = manifest.find("\"Rainbow\",").unwrap();
    let interface = manifest.rfind(".target(name: \"LoginInterface\"),").unwrap();
    assert!(product < named && named < interface);
    assert!(manifest.contains(".package(path: \"../Awesome\")"));
    assert!(manifest.contains(".iOS(.v15)"));

    let source = h.fs.read_file(Path::new("/work/Login/Sources/Login/Login.swift")).unwrap();
    assert!(source.contains("Created by Ada on 2026-05-04T09:30:00Z"));
    assert!(h.fs.exists(Path::new("/work/Login/Sources/LoginInterface/LoginInterface.swift")));
    assert!(!h.fs.exists(Path::new("/work/Login/Example")));
}

#[test]
fn microapp_registers_in_configured_workspace() {
    let fs = MemoryFilesystem::new().with_dir("/work");
    let mut h = harness(fs);
    let container = h.registry.create_workspace(Path::new("/work"), "Modules").unwrap();
    h.store
        .set(keys::REGISTER_IN_WORKSPACE, "Modules.modworkspace".into(), LayerKind::Project)
        .unwrap();
    h.store
        .set(keys::SKIP_DEPENDENCY_RESOLVER, true.into(), LayerKind::Project)
        .unwrap();

    let module = ModuleConfiguration::builder("Cart", ModuleKind::MicroApp)
        .target_path("/work/Cart")
        .build()
        .unwrap();
    let report = h
        .generation
        .generate(&module, h.store.merged(), &GenerationOptions::default())
        .unwrap();

    assert_eq!(report.resolution, ResolutionOutcome::Skipped);
    assert_eq!(report.workspace, Some((container.clone(), true)));
    assert!(h.fs.exists(Path::new("/work/Cart/Example/CartExample/CartExampleApp.swift")));

    let members = h.registry.list_packages(&container).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name(), "Cart");
    assert_eq!(members[0].kind(), PackageKind::Package);
}

#[test]
fn excluded_dependencies_are_left_out() {
    let fs = MemoryFilesystem::new().with_dir("/work");
    let mut h = harness(fs);
    h.store
        .set_raw(keys::DEPENDENCY_EXCLUSIONS, "Rainbow", LayerKind::Project)
        .unwrap();

    let module = ModuleConfiguration::builder("Login", ModuleKind::Core)
        .target_path("/work/Login")
        .remote(RemoteDependency::new("Rainbow", "https://r", "from: \"1.0.0\""))
        .build()
        .unwrap();
    h.generation
        .generate(&module, h.store.merged(), &GenerationOptions::default())
        .unwrap();

    let manifest = h.fs.read_file(Path::new("/work/Login/Package.swift")).unwrap();
    assert!(!manifest.contains("Rainbow"));
}

#[test]
fn existing_module_needs_force() {
    let fs = MemoryFilesystem::new().with_file("/work/Login/old.txt", "keep");
    let h = harness(fs);
    let config = MergedConfiguration::defaults();
    let module = ModuleConfiguration::builder("Login", ModuleKind::Shared)
        .target_path("/work/Login")
        .build()
        .unwrap();

    let err = h
        .generation
        .generate(&module, &config, &GenerationOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(h.fs.exists(Path::new("/work/Login/old.txt")));

    let options = GenerationOptions {
        force: true,
        ..Default::default()
    };
    h.generation.generate(&module, &config, &options).unwrap();
    assert!(!h.fs.exists(Path::new("/work/Login/old.txt")));
    assert!(h.fs.exists(Path::new("/work/Login/Package.swift")));
}

#[test]
fn failed_write_leaves_nothing_behind() {
    let fs = MemoryFilesystem::new().with_dir("/work");
    fs.deny_writes("/work/Login/Tests");
    let h = harness(fs);
    let module = ModuleConfiguration::builder("Login", ModuleKind::Feature)
        .target_path("/work/Login")
        .build()
        .unwrap();

    let result = h.generation.generate(
        &module,
        &MergedConfiguration::defaults(),
        &GenerationOptions::default(),
    );

    assert!(result.is_err());
    assert!(!h.fs.exists(Path::new("/work/Login")));
}

#[test]
fn preview_writes_nothing() {
    let h = harness(MemoryFilesystem::new().with_dir("/work"));
    let module = ModuleConfiguration::builder("Login", ModuleKind::MicroApp)
        .target_path("/work/Login")
        .build()
        .unwrap();

    let tree = h
        .generation
        .preview(&module, &MergedConfiguration::defaults())
        .unwrap();

    assert_eq!(tree.file_count(), 7);
    assert!(!h.fs.exists(Path::new("/work/Login")));
}

impl Harness {
    fn local_dependency<const N: usize>(
        &self,
        path: &str,
        exposed: [&str; N],
    ) -> LocalDependency {
        let shared: Arc<dyn Filesystem> = Arc::new(self.fs.clone());
        DependencyResolver::new(shared.clone(), Arc::new(ManifestProductCatalog::new(shared)))
            .local_dependency(
                Path::new(path),
                Some(exposed.iter().map(|p| p.to_string()).collect()),
            )
            .unwrap()
    }
}
