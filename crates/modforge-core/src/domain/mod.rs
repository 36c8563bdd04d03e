// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for modforge.
//!
//! Pure logic only: configuration layers and their merge, dependency
//! declarations, module configuration, the rendered module tree and the
//! workspace container. All I/O goes through the ports defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: paths are computed lexically, never canonicalized here
//! - **No clock**: timestamps arrive through the `Clock` port
//! - **Immutable layers**: edits produce replacement values
//!
// Public API
pub mod entities;
pub mod error;
pub mod paths;
pub mod value;
pub mod value_objects;

mod validation;

pub use entities::{
    ConfigurationLayer, FileToWrite, LocalDependency, MemberPackage, MergedConfiguration,
    ModuleConfiguration, ModuleConfigurationBuilder, ModuleTree, PackageDeclaration,
    RemoteDependency, ResolvedDependencies, TargetDeclaration, TemplateContext,
    WorkspaceContainer, WorkspaceValidation,
    configuration::keys,
    dependency::interface_name,
    module::context_keys,
};

pub use error::{DomainError, ErrorCategory};
pub use paths::{RelativePath, normalize, relative_path};
pub use value::{Value, ValueMap};
pub use value_objects::{LayerKind, ModuleKind, PackageKind, Platform, PlatformOs};

pub use validation::DomainValidator;
