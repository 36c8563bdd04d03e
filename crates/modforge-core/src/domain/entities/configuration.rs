//! Configuration layers and their merged view.
//!
//! A [`ConfigurationLayer`] is an immutable snapshot of one source. Edits
//! produce a replacement layer; the [`MergedConfiguration`] is re-folded from
//! its layers every time one is replaced, so the merged view can never drift
//! from the layers it was built from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::{
    error::DomainError,
    value::{self, Value, ValueMap},
    value_objects::LayerKind,
};

/// Well-known configuration keys.
pub mod keys {
    pub const AUTHOR: &str = "author";
    pub const ORGANIZATION: &str = "organizationName";
    pub const BUNDLE_IDENTIFIER: &str = "bundleIdentifier";
    pub const TOOLS_VERSION: &str = "swiftToolsVersion";
    pub const PLATFORMS: &str = "platforms";
    pub const SKIP_DEPENDENCY_RESOLVER: &str = "skipDependencyResolver";
    pub const DEPENDENCY_EXCLUSIONS: &str = "dependencyExclusions";
    pub const CUSTOM_VARIABLES: &str = "customVariables";
    /// Optional container to register generated modules in. No default.
    pub const REGISTER_IN_WORKSPACE: &str = "registerInWorkspace";
}

/// One source of configuration values with a fixed precedence rank.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationLayer {
    kind: LayerKind,
    source: Option<PathBuf>,
    settings: ValueMap,
}

impl ConfigurationLayer {
    pub fn new(kind: LayerKind, settings: ValueMap) -> Self {
        Self {
            kind,
            source: None,
            settings,
        }
    }

    pub fn empty(kind: LayerKind) -> Self {
        Self::new(kind, ValueMap::new())
    }

    /// Record where the layer was read from.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Built-in defaults. Every key the tool understands appears here, which
    /// also makes this layer the type schema for command-line coercion.
    pub fn defaults() -> Self {
        let mut settings = ValueMap::new();
        settings.insert(keys::AUTHOR.into(), Value::from(""));
        settings.insert(keys::ORGANIZATION.into(), Value::from(""));
        settings.insert(keys::BUNDLE_IDENTIFIER.into(), Value::from("com.example"));
        settings.insert(keys::TOOLS_VERSION.into(), Value::from("5.9"));
        settings.insert(keys::PLATFORMS.into(), Value::string_list(["ios@15"]));
        settings.insert(keys::SKIP_DEPENDENCY_RESOLVER.into(), Value::Bool(false));
        settings.insert(keys::DEPENDENCY_EXCLUSIONS.into(), Value::List(Vec::new()));
        settings.insert(keys::CUSTOM_VARIABLES.into(), Value::Map(ValueMap::new()));
        Self::new(LayerKind::Default, settings)
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn settings(&self) -> &ValueMap {
        &self.settings
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        value::get_path(&self.settings, path)
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Copy of this layer with `path` set to `value`.
    pub fn with_value(&self, path: &str, value: Value) -> Result<Self, DomainError> {
        let mut next = self.clone();
        value::set_path(&mut next.settings, path, value)?;
        Ok(next)
    }

    /// Copy of this layer without `path`, and whether anything was removed.
    pub fn without_value(&self, path: &str) -> (Self, bool) {
        let mut next = self.clone();
        let removed = value::remove_path(&mut next.settings, path).is_some();
        (next, removed)
    }
}

/// The fold of all layers, highest precedence last.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfiguration {
    layers: Vec<ConfigurationLayer>,
    merged: ValueMap,
}

impl MergedConfiguration {
    /// Fold layers in precedence order.
    ///
    /// Layers are ordered by [`LayerKind`] (stable, so two layers of the same
    /// kind keep their relative order) before folding.
    pub fn fold(mut layers: Vec<ConfigurationLayer>) -> Self {
        layers.sort_by_key(ConfigurationLayer::kind);

        let mut merged = ValueMap::new();
        for layer in &layers {
            value::merge_maps(&mut merged, layer.settings.clone());
        }

        Self { layers, merged }
    }

    /// Defaults only.
    pub fn defaults() -> Self {
        Self::fold(vec![ConfigurationLayer::defaults()])
    }

    pub fn settings(&self) -> &ValueMap {
        &self.merged
    }

    pub fn layers(&self) -> &[ConfigurationLayer] {
        &self.layers
    }

    /// Highest-precedence layer of the given kind.
    pub fn layer(&self, kind: LayerKind) -> Option<&ConfigurationLayer> {
        self.layers.iter().rev().find(|l| l.kind() == kind)
    }

    /// Replace (or add) the layer of `layer.kind()` and re-fold.
    pub fn with_layer(&self, layer: ConfigurationLayer) -> Self {
        let kind = layer.kind();
        let mut layers: Vec<_> = self
            .layers
            .iter()
            .filter(|l| l.kind() != kind)
            .cloned()
            .collect();
        layers.push(layer);
        Self::fold(layers)
    }

    /// Value at a dotted path. Never fails.
    pub fn get(&self, path: &str) -> Option<&Value> {
        value::get_path(&self.merged, path)
    }

    /// Which layer supplied the effective value at `path`.
    pub fn origin(&self, path: &str) -> Option<LayerKind> {
        self.layers
            .iter()
            .rev()
            .find(|l| l.get(path).is_some())
            .map(ConfigurationLayer::kind)
    }

    pub fn get_bool(&self, path: &str) -> Result<Option<bool>, DomainError> {
        self.typed(path, "bool", Value::as_bool)
    }

    pub fn get_str(&self, path: &str) -> Result<Option<&str>, DomainError> {
        self.typed(path, "string", Value::as_str)
    }

    pub fn get_map(&self, path: &str) -> Result<Option<&ValueMap>, DomainError> {
        self.typed(path, "map", Value::as_map)
    }

    /// A list whose items are all strings.
    pub fn get_string_list(&self, path: &str) -> Result<Option<Vec<String>>, DomainError> {
        let Some(items) = self.typed(path, "list", Value::as_list)? else {
            return Ok(None);
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(ToString::to_string)
                    .ok_or_else(|| DomainError::ConfigKey {
                        key: path.to_string(),
                        expected: "list of strings",
                        found: item.type_name(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Non-empty string, treating `""` as unset.
    pub fn get_non_empty_str(&self, path: &str) -> Result<Option<&str>, DomainError> {
        Ok(self.get_str(path)?.filter(|s| !s.trim().is_empty()))
    }

    /// Flattened `dotted.path -> value` view for display.
    pub fn all_settings(&self) -> BTreeMap<String, String> {
        value::flatten(&self.merged)
    }

    fn typed<'a, T>(
        &'a self,
        path: &str,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, DomainError> {
        match self.get(path) {
            None => Ok(None),
            Some(v) => extract(v).map(Some).ok_or_else(|| DomainError::ConfigKey {
                key: path.to_string(),
                expected,
                found: v.type_name(),
            }),
        }
    }
}

impl Default for MergedConfiguration {
    fn default() -> Self {
        Self::defaults()
    }
}
