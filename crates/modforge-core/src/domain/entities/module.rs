//! Module configuration and the template context derived from it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ModuleConfiguration (built per generation request)         │
//! │  ├── identity: name, kind, author, organization, bundle id  │
//! │  ├── target_path (absolute directory of the new package)    │
//! │  ├── platforms                                              │
//! │  ├── remote + local dependencies (declaration order)        │
//! │  └── custom variables                                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TemplateContext (ordered map handed to the renderer)       │
//! │  └── name, platforms, packageDependencies, ..., year        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::{
    entities::dependency::{LocalDependency, RemoteDependency},
    error::DomainError,
    value::{Value, ValueMap},
    value_objects::{ModuleKind, Platform},
};

/// Everything needed to generate one module.
///
/// Identity fields are optional: absent values fall back to configuration
/// when the context is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleConfiguration {
    name: String,
    kind: ModuleKind,
    target_path: PathBuf,
    author: Option<String>,
    organization: Option<String>,
    bundle_identifier: Option<String>,
    tools_version: Option<String>,
    platforms: Vec<Platform>,
    remote_dependencies: Vec<RemoteDependency>,
    local_dependencies: Vec<LocalDependency>,
    custom_variables: ValueMap,
}

impl ModuleConfiguration {
    pub fn builder(name: impl Into<String>, kind: ModuleKind) -> ModuleConfigurationBuilder {
        ModuleConfigurationBuilder::new(name, kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn bundle_identifier(&self) -> Option<&str> {
        self.bundle_identifier.as_deref()
    }

    pub fn tools_version(&self) -> Option<&str> {
        self.tools_version.as_deref()
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn remote_dependencies(&self) -> &[RemoteDependency] {
        &self.remote_dependencies
    }

    pub fn local_dependencies(&self) -> &[LocalDependency] {
        &self.local_dependencies
    }

    pub fn custom_variables(&self) -> &ValueMap {
        &self.custom_variables
    }

    /// Copy without the named dependencies (local or remote).
    pub fn excluding(&self, names: &[String]) -> Self {
        let mut next = self.clone();
        next.local_dependencies
            .retain(|d| !names.iter().any(|n| n == d.name()));
        next.remote_dependencies
            .retain(|d| !names.iter().any(|n| n == d.name()));
        next
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_module_name(&self.name)?;

        if !self.target_path.is_absolute() {
            return Err(DomainError::AbsolutePathRequired {
                path: self.target_path.display().to_string(),
            });
        }

        for dep in &self.local_dependencies {
            if dep.name() == self.name {
                return Err(DomainError::InvalidModule(format!(
                    "module '{}' cannot depend on itself",
                    self.name
                )));
            }
        }

        Ok(())
    }
}

/// Module names become target and type names, so they must be identifiers.
pub fn validate_module_name(name: &str) -> Result<(), DomainError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(DomainError::MissingRequiredField { field: "name" });
    };
    if !first.is_ascii_alphabetic() {
        return Err(DomainError::InvalidModule(format!(
            "name '{name}' must start with a letter"
        )));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DomainError::InvalidModule(format!(
            "name '{name}' may only contain letters, digits and '_'"
        )));
    }
    Ok(())
}

/// Builder for [`ModuleConfiguration`].
#[derive(Debug, Clone)]
pub struct ModuleConfigurationBuilder {
    inner: ModuleConfiguration,
}

impl ModuleConfigurationBuilder {
    fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            inner: ModuleConfiguration {
                name: name.into(),
                kind,
                target_path: PathBuf::new(),
                author: None,
                organization: None,
                bundle_identifier: None,
                tools_version: None,
                platforms: Vec::new(),
                remote_dependencies: Vec::new(),
                local_dependencies: Vec::new(),
                custom_variables: ValueMap::new(),
            },
        }
    }

    pub fn target_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner.target_path = path.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.inner.author = Some(author.into());
        self
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.inner.organization = Some(organization.into());
        self
    }

    pub fn bundle_identifier(mut self, id: impl Into<String>) -> Self {
        self.inner.bundle_identifier = Some(id.into());
        self
    }

    pub fn tools_version(mut self, version: impl Into<String>) -> Self {
        self.inner.tools_version = Some(version.into());
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.inner.platforms.push(platform);
        self
    }

    pub fn remote(mut self, dep: RemoteDependency) -> Self {
        self.inner.remote_dependencies.push(dep);
        self
    }

    pub fn local(mut self, dep: LocalDependency) -> Self {
        self.inner.local_dependencies.push(dep);
        self
    }

    pub fn variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner.custom_variables.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<ModuleConfiguration, DomainError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

/// Context keys shared with templates.
pub mod context_keys {
    pub const NAME: &str = "name";
    pub const MODULE_KIND: &str = "moduleKind";
    pub const INTERFACE_NAME: &str = "interfaceName";
    pub const TESTS_NAME: &str = "testsName";
    pub const AUTHOR: &str = "author";
    pub const ORGANIZATION: &str = "organizationName";
    pub const BUNDLE_IDENTIFIER: &str = "bundleIdentifier";
    pub const TOOLS_VERSION: &str = "swiftToolsVersion";
    pub const PLATFORMS: &str = "platforms";
    pub const PACKAGE_DEPENDENCIES: &str = "packageDependencies";
    pub const TARGET_DEPENDENCIES: &str = "targetDependencies";
    pub const CUSTOM_VARIABLES: &str = "customVariables";
    pub const TIMESTAMP: &str = "timestamp";
    pub const YEAR: &str = "year";
}

/// Ordered mapping of named values handed to the renderer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateContext {
    values: BTreeMap<String, Value>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        crate::domain::value::get_path(&self.values, key)
    }

    /// String value, or the display form of a non-string value.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
