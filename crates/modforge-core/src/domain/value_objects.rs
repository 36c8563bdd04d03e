//! Domain value objects: ModuleKind, Platform, LayerKind, PackageKind.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. This
//! file defines the types, their string representations and their `FromStr`
//! parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. If it is a module kind, register its templates in the renderer adapter

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ModuleKind ───────────────────────────────────────────────────────────────

/// The role a generated module plays in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Core,
    Feature,
    Shared,
    MicroApp,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 4] = [Self::Core, Self::Feature, Self::Shared, Self::MicroApp];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Feature => "feature",
            Self::Shared => "shared",
            Self::MicroApp => "microapp",
        }
    }

    /// Whether the module ships a runnable example app next to the library.
    pub const fn has_example_app(self) -> bool {
        matches!(self, Self::MicroApp)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "core" => Ok(Self::Core),
            "feature" => Ok(Self::Feature),
            "shared" => Ok(Self::Shared),
            "microapp" | "micro-app" | "micro_app" => Ok(Self::MicroApp),
            other => Err(DomainError::UnknownModuleKind(other.into())),
        }
    }
}

// ── Platform ─────────────────────────────────────────────────────────────────

/// Operating systems a package can declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformOs {
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "macOS")]
    MacOs,
    #[serde(rename = "tvOS")]
    TvOs,
    #[serde(rename = "watchOS")]
    WatchOs,
    #[serde(rename = "visionOS")]
    VisionOs,
}

impl PlatformOs {
    /// Manifest spelling, e.g. `iOS`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::MacOs => "macOS",
            Self::TvOs => "tvOS",
            Self::WatchOs => "watchOS",
            Self::VisionOs => "visionOS",
        }
    }
}

impl FromStr for PlatformOs {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "macos" | "osx" => Ok(Self::MacOs),
            "tvos" => Ok(Self::TvOs),
            "watchos" => Ok(Self::WatchOs),
            "visionos" => Ok(Self::VisionOs),
            other => Err(DomainError::InvalidPlatform {
                input: other.into(),
                reason: "unknown operating system".into(),
            }),
        }
    }
}

/// A deployment target: operating system plus minimum version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    os: PlatformOs,
    version: String,
}

impl Platform {
    pub fn new(os: PlatformOs, version: impl Into<String>) -> Self {
        Self {
            os,
            version: version.into(),
        }
    }

    pub fn os(&self) -> PlatformOs {
        self.os
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Manifest description, e.g. `.iOS(.v15)` or `.macOS(.v13_3)`.
    pub fn describe(&self) -> String {
        format!(".{}(.v{})", self.os.as_str(), self.version.replace('.', "_"))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.os.as_str().to_ascii_lowercase(), self.version)
    }
}

/// Accepts `ios@15`, `iOS 15` and `macos@13.3`.
impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (os, version) = trimmed
            .split_once('@')
            .or_else(|| trimmed.split_once(' '))
            .ok_or_else(|| DomainError::InvalidPlatform {
                input: s.into(),
                reason: "expected <os>@<version>".into(),
            })?;

        let version = version.trim();
        let well_formed = !version.is_empty()
            && version
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
        if !well_formed {
            return Err(DomainError::InvalidPlatform {
                input: s.into(),
                reason: "version must be numeric, e.g. 15 or 13.3".into(),
            });
        }

        Ok(Self::new(os.trim().parse()?, version))
    }
}

// ── LayerKind ────────────────────────────────────────────────────────────────

/// Provenance of a configuration layer. Declaration order is precedence
/// order: later variants override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Default,
    User,
    Project,
}

impl LayerKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::User => "user",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PackageKind ──────────────────────────────────────────────────────────────

/// Kind of a workspace member, inferred from its directory contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// Directory containing a package manifest.
    Package,
    /// Plain directory reference.
    Folder,
}

impl PackageKind {
    /// File whose presence marks a directory as a package.
    pub const MANIFEST_FILE: &'static str = "Package.swift";

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Folder => "folder",
        }
    }

    pub fn infer(has_manifest: bool) -> Self {
        if has_manifest {
            Self::Package
        } else {
            Self::Folder
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "package" => Ok(Self::Package),
            "folder" => Ok(Self::Folder),
            other => Err(format!("unknown member kind '{other}'")),
        }
    }
}
