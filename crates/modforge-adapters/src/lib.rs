//! Port implementations for modforge: disk access, TOML documents, the
//! template renderer and its override loader, `Package.swift` product
//! discovery, the Swift toolchain and the clock.

pub mod catalog;
pub mod clock;
pub mod codec;
pub mod filesystem;
pub mod renderer;
pub mod template_loader;
pub mod toolchain;

pub use catalog::ManifestProductCatalog;
pub use clock::{FixedClock, SystemClock};
pub use codec::TomlCodec;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::SimpleRenderer;
pub use template_loader::FilesystemTemplateLoader;
pub use toolchain::{NoopToolchain, SwiftToolchain};
