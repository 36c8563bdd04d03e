//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `modforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations, including atomic replacement
//!   - `DocumentCodec`: Structured document encoding (TOML in production)
//!   - `TemplateRenderer`: Named template rendering
//!   - `Clock`: Time source for generated timestamps
//!   - `ProductCatalog`: Products offered by a local package
//!   - `PackageToolchain`: Post-generation package resolution
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{Clock, DocumentCodec, Filesystem, PackageToolchain, ProductCatalog, TemplateRenderer};

#[cfg(test)]
pub use output::{
    MockClock, MockDocumentCodec, MockFilesystem, MockPackageToolchain, MockProductCatalog,
    MockTemplateRenderer,
};
