//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "merge configuration" or "generate a module".

pub mod assembler;
pub mod config_store;
pub mod dependency_resolver;
pub mod generation_service;
pub mod workspace_registry;

pub use assembler::ModuleConfigurationAssembler;
pub use config_store::{ConfigSearchPaths, ConfigurationStore};
pub use dependency_resolver::DependencyResolver;
pub use generation_service::{
    GenerationOptions, GenerationReport, GenerationService, ResolutionOutcome, module_layout,
};
pub use workspace_registry::WorkspaceRegistry;
