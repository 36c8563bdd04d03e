pub mod configuration;
pub mod dependency;
pub mod module;
pub mod module_tree;
pub mod workspace;

pub use crate::domain::DomainError;
pub use configuration::{ConfigurationLayer, MergedConfiguration};
pub use dependency::{
    LocalDependency, PackageDeclaration, RemoteDependency, ResolvedDependencies,
    TargetDeclaration,
};
pub use module::{ModuleConfiguration, ModuleConfigurationBuilder, TemplateContext};
pub use module_tree::{FileToWrite, ModuleTree};
pub use workspace::{MemberPackage, WorkspaceContainer, WorkspaceValidation};
