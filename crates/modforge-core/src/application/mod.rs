//! Use cases over the domain model.
//!
//! Services receive their collaborators as `Arc<dyn Port>`; the `ports`
//! module lists those traits. Rules about names, dependencies and
//! containers stay in [`crate::domain`].

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ConfigSearchPaths, ConfigurationStore, DependencyResolver, GenerationOptions,
    GenerationReport, GenerationService, ModuleConfigurationAssembler, ResolutionOutcome,
    WorkspaceRegistry,
};

pub use ports::{Clock, DocumentCodec, Filesystem, PackageToolchain, ProductCatalog, TemplateRenderer};

pub use error::ApplicationError;
