//! Product catalog backed by a package's manifest file.

use std::{path::Path, sync::Arc};

use modforge_core::{
    application::ports::{Filesystem, ProductCatalog},
    domain::PackageKind,
    error::ModforgeResult,
};
use tracing::{debug, instrument};

const LIBRARY_MARKER: &str = ".library(";
const NAME_LABEL: &str = "name:";

/// Reads `Package.swift` and lists every `.library(name: "...")` product.
///
/// This is a textual scan, not a Swift parser. Products declared through
/// computed expressions are not found.
pub struct ManifestProductCatalog {
    filesystem: Arc<dyn Filesystem>,
}

impl ManifestProductCatalog {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }
}

impl ProductCatalog for ManifestProductCatalog {
    #[instrument(skip(self), fields(package = %package_path.display()))]
    fn available_products(&self, package_path: &Path) -> ModforgeResult<Vec<String>> {
        let manifest = self
            .filesystem
            .read_to_string(&package_path.join(PackageKind::MANIFEST_FILE))?;
        let products = library_products(&manifest);
        debug!(count = products.len(), "scanned manifest products");
        Ok(products)
    }
}

/// Names of the library products declared in manifest text, in order.
pub fn library_products(manifest: &str) -> Vec<String> {
    let mut products: Vec<String> = Vec::new();
    let mut rest = manifest;

    while let Some(at) = rest.find(LIBRARY_MARKER) {
        rest = &rest[at + LIBRARY_MARKER.len()..];
        if let Some(name) = quoted_name(rest)
            && !products.iter().any(|p| p == name)
        {
            products.push(name.to_string());
        }
    }

    products
}

fn quoted_name(call: &str) -> Option<&str> {
    let after_label = call.trim_start().strip_prefix(NAME_LABEL)?;
    let after_quote = after_label.trim_start().strip_prefix('"')?;
    let end = after_quote.find('"')?;
    Some(&after_quote[..end])
}
