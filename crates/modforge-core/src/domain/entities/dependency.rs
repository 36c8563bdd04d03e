//! Dependency declarations and their manifest renderings.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{error::DomainError, paths::RelativePath};

/// A dependency fetched from a remote locator.
///
/// Equality is by name: two declarations of `Rainbow` are the same
/// dependency even if their constraints differ.
#[derive(Debug, Clone, Eq)]
pub struct RemoteDependency {
    name: String,
    locator: String,
    constraint: String,
}

impl RemoteDependency {
    /// `constraint` is carried verbatim into the manifest, e.g.
    /// `from: "1.0.0"` or `"1.0.0"..<"2.0.0"`.
    pub fn new(
        name: impl Into<String>,
        locator: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            constraint: constraint.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn constraint(&self) -> &str {
        &self.constraint
    }
}

impl PartialEq for RemoteDependency {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::hash::Hash for RemoteDependency {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A dependency referenced by filesystem path.
///
/// Invariant checked by [`LocalDependency::validate`]: every exposed product
/// is also available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDependency {
    name: String,
    path: PathBuf,
    exposed: Vec<String>,
    available: BTreeSet<String>,
}

impl LocalDependency {
    pub fn new<E, A, S, T>(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        exposed: E,
        available: A,
    ) -> Self
    where
        E: IntoIterator<Item = S>,
        S: Into<String>,
        A: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let exposed = exposed
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| seen.insert(p.clone()))
            .collect();

        Self {
            name: name.into(),
            path: path.into(),
            exposed,
            available: available.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exposed products in declaration order, without duplicates.
    pub fn exposed(&self) -> &[String] {
        &self.exposed
    }

    pub fn available(&self) -> &BTreeSet<String> {
        &self.available
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let missing: Vec<String> = self
            .exposed
            .iter()
            .filter(|p| !self.available.contains(*p))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::ExposedProductsUnavailable {
                dependency: self.name.clone(),
                missing,
            })
        }
    }
}

/// One entry of the package-level dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageDeclaration {
    Path {
        name: String,
        path: RelativePath,
    },
    Remote {
        name: String,
        locator: String,
        constraint: String,
    },
}

impl PackageDeclaration {
    pub fn name(&self) -> &str {
        match self {
            Self::Path { name, .. } | Self::Remote { name, .. } => name,
        }
    }
}

impl fmt::Display for PackageDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path { path, .. } => write!(f, ".package(path: \"{path}\")"),
            Self::Remote {
                locator,
                constraint,
                ..
            } => write!(f, ".package(url: \"{locator}\", {constraint})"),
        }
    }
}

/// One entry of the main target's dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetDeclaration {
    /// A product exposed by a local package.
    Product { name: String, package: String },
    /// A remote package referenced by name.
    Named(String),
    /// The module's own generated interface target.
    Interface(String),
}

impl fmt::Display for TargetDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product { name, package } => {
                write!(f, ".product(name: \"{name}\", package: \"{package}\")")
            }
            Self::Named(name) => write!(f, "\"{name}\""),
            Self::Interface(name) => write!(f, ".target(name: \"{name}\")"),
        }
    }
}

/// Resolver output: both declaration lists, already ordered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedDependencies {
    pub package: Vec<PackageDeclaration>,
    pub target: Vec<TargetDeclaration>,
}

impl ResolvedDependencies {
    pub fn package_lines(&self) -> Vec<String> {
        self.package.iter().map(ToString::to_string).collect()
    }

    pub fn target_lines(&self) -> Vec<String> {
        self.target.iter().map(ToString::to_string).collect()
    }
}

/// Name of the interface product generated for every module.
pub fn interface_name(module_name: &str) -> String {
    format!("{module_name}Interface")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_equality_is_by_name() {
        let a = RemoteDependency::new("Rainbow", "https://a", "from: \"1.0.0\"");
        let b = RemoteDependency::new("Rainbow", "https://b", "exact: \"2.0.0\"");
        assert_eq!(a, b);
    }

    #[test]
    fn exposed_products_must_be_available() {
        let ok = LocalDependency::new("Awesome", "/w/Awesome", ["AwesomeKit"], ["AwesomeKit", "AwesomeUI"]);
        assert!(ok.validate().is_ok());

        let bad = LocalDependency::new("Awesome", "/w/Awesome", ["AwesomeKit", "Ghost"], ["AwesomeKit"]);
        assert_eq!(
            bad.validate(),
            Err(DomainError::ExposedProductsUnavailable {
                dependency: "Awesome".into(),
                missing: vec!["Ghost".into()],
            })
        );
    }

    #[test]
    fn exposed_products_are_deduplicated_in_order() {
        let dep = LocalDependency::new("A", "/a", ["Y", "X", "Y"], ["X", "Y"]);
        assert_eq!(dep.exposed(), ["Y".to_string(), "X".to_string()]);
    }

    #[test]
    fn declarations_render_as_manifest_fragments() {
        let path = PackageDeclaration::Path {
            name: "Awesome".into(),
            path: RelativePath::try_new("../Awesome").unwrap(),
        };
        let remote = PackageDeclaration::Remote {
            name: "Rainbow".into(),
            locator: "https://github.com/acme/Rainbow.git".into(),
            constraint: "from: \"1.0.0\"".into(),
        };

        assert_eq!(path.to_string(), ".package(path: \"../Awesome\")");
        assert_eq!(
            remote.to_string(),
            ".package(url: \"https://github.com/acme/Rainbow.git\", from: \"1.0.0\")"
        );
        assert_eq!(
            TargetDeclaration::Interface(interface_name("Login")).to_string(),
            ".target(name: \"LoginInterface\")"
        );
    }
}
