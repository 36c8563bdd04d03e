//! Workspace container aggregate.
//!
//! The container is the only persistent entity. Members are held in memory
//! with canonical absolute paths and persisted relative to the directory
//! that holds the container file, so a workspace can be moved as a whole.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::{
    error::DomainError,
    paths::{self, normalize},
    value::{Value, ValueMap},
    value_objects::PackageKind,
};

/// File extension of workspace container files.
pub const CONTAINER_EXTENSION: &str = "modworkspace";

/// An entry in a workspace's persisted package list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPackage {
    name: String,
    path: PathBuf,
    kind: PackageKind,
}

impl MemberPackage {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: PackageKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> PackageKind {
        self.kind
    }
}

/// Result of structurally validating a container document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceValidation {
    Valid { member_count: usize },
    Invalid { reason: String },
}

impl WorkspaceValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// A workspace container and its ordered members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContainer {
    path: PathBuf,
    name: String,
    members: Vec<MemberPackage>,
}

impl WorkspaceContainer {
    /// Empty container persisted at `path` (the container file itself).
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Container file location for a workspace called `name` inside `dir`.
    pub fn location(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.{CONTAINER_EXTENSION}"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory member paths are persisted relative to.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("/"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[MemberPackage] {
        &self.members
    }

    pub fn contains(&self, canonical_path: &Path) -> bool {
        self.members.iter().any(|m| m.path == canonical_path)
    }

    /// Append a member unless its path is already registered.
    ///
    /// Returns `true` when the container changed.
    pub fn add(&mut self, member: MemberPackage) -> bool {
        if self.contains(&member.path) {
            return false;
        }
        self.members.push(member);
        true
    }

    /// Remove the member at `canonical_path`. Returns `true` when the
    /// container changed.
    pub fn remove(&mut self, canonical_path: &Path) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.path != canonical_path);
        self.members.len() != before
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(&member.path) {
                return Err(DomainError::DuplicateMember {
                    path: member.path.display().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Persistable document form.
    pub fn to_document(&self) -> Result<ValueMap, DomainError> {
        let mut members = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let relative = paths::relative_path(self.directory(), &member.path)?;
            let mut entry = ValueMap::new();
            entry.insert("name".into(), Value::from(member.name.as_str()));
            entry.insert("path".into(), Value::from(relative.to_portable_string()));
            entry.insert("kind".into(), Value::from(member.kind.as_str()));
            members.push(Value::Map(entry));
        }

        let mut doc = ValueMap::new();
        doc.insert("name".into(), Value::from(self.name.as_str()));
        doc.insert("members".into(), Value::List(members));
        Ok(doc)
    }

    /// Rebuild a container from its document.
    ///
    /// The document must pass [`inspect_document`]; otherwise the first
    /// structural defect is returned as the error reason.
    pub fn from_document(path: impl Into<PathBuf>, doc: &Value) -> Result<Self, String> {
        let path = path.into();
        let directory = path.parent().unwrap_or_else(|| Path::new("/")).to_path_buf();

        if let WorkspaceValidation::Invalid { reason } = inspect_document(&directory, doc) {
            return Err(reason);
        }

        let name = doc
            .as_map()
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_else(|| default_name(&path));

        let mut container = Self::new(path, name);
        for entry in member_entries(doc) {
            let Some(entry) = entry.as_map() else { continue };
            let (Some(name), Some(raw_path)) = (
                entry.get("name").and_then(Value::as_str),
                entry.get("path").and_then(Value::as_str),
            ) else {
                continue;
            };
            let kind = entry
                .get("kind")
                .and_then(Value::as_str)
                .and_then(|k| k.parse().ok())
                .unwrap_or(PackageKind::Folder);

            container.members.push(MemberPackage::new(
                name,
                resolve_member_path(&directory, raw_path),
                kind,
            ));
        }
        Ok(container)
    }
}

/// Workspace name derived from a container file name.
fn default_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Workspace")
        .to_string()
}

fn member_entries(doc: &Value) -> &[Value] {
    doc.as_map()
        .and_then(|m| m.get("members"))
        .and_then(Value::as_list)
        .unwrap_or(&[])
}

fn resolve_member_path(directory: &Path, raw: &str) -> PathBuf {
    normalize(&directory.join(raw))
}

/// Structural check of a container document.
///
/// Reports the first defect found: a member entry that is not a table, a
/// missing or empty path, a missing name, an unknown kind, or two entries
/// resolving to the same path.
pub fn inspect_document(directory: &Path, doc: &Value) -> WorkspaceValidation {
    let invalid = |reason: String| WorkspaceValidation::Invalid { reason };

    let Some(root) = doc.as_map() else {
        return invalid("container root is not a table".into());
    };

    if let Some(name) = root.get("name") {
        if name.as_str().is_none() {
            return invalid(format!("workspace name is a {}, expected string", name.type_name()));
        }
    }

    let entries = match root.get("members") {
        None => return WorkspaceValidation::Valid { member_count: 0 },
        Some(Value::List(entries)) => entries,
        Some(other) => {
            return invalid(format!("'members' is a {}, expected list", other.type_name()));
        }
    };

    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let position = index + 1;
        let Some(entry) = entry.as_map() else {
            return invalid(format!("member #{position} is not a table"));
        };

        let path = match entry.get("path") {
            None => return invalid(format!("member #{position} is missing a path")),
            Some(Value::String(p)) if p.trim().is_empty() => {
                return invalid(format!("member #{position} has an empty path"));
            }
            Some(Value::String(p)) => p,
            Some(other) => {
                return invalid(format!(
                    "member #{position} path is a {}, expected string",
                    other.type_name()
                ));
            }
        };

        match entry.get("name").and_then(Value::as_str) {
            Some(n) if !n.trim().is_empty() => {}
            _ => return invalid(format!("member #{position} ({path}) is missing a name")),
        }

        if let Some(kind) = entry.get("kind") {
            let parsed = kind.as_str().map(str::parse::<PackageKind>);
            match parsed {
                Some(Ok(_)) => {}
                Some(Err(reason)) => return invalid(format!("member #{position}: {reason}")),
                None => return invalid(format!("member #{position} kind is not a string")),
            }
        }

        if !seen.insert(resolve_member_path(directory, path)) {
            return invalid(format!("member #{position} duplicates path '{path}'"));
        }
    }

    WorkspaceValidation::Valid {
        member_count: entries.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> WorkspaceContainer {
        WorkspaceContainer::new("/work/Modules.modworkspace", "Modules")
    }

    fn member(name: &str) -> MemberPackage {
        MemberPackage::new(name, format!("/work/{name}"), PackageKind::Package)
    }

    #[test]
    fn add_is_idempotent() {
        let mut ws = container();
        assert!(ws.add(member("Feature")));
        assert!(!ws.add(member("Feature")));
        assert_eq!(ws.members().len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut ws = container();
        ws.add(member("Feature"));
        assert!(ws.remove(Path::new("/work/Feature")));
        assert!(!ws.remove(Path::new("/work/Feature")));
        assert!(ws.members().is_empty());
    }

    #[test]
    fn members_keep_insertion_order() {
        let mut ws = container();
        for name in ["Zeta", "Alpha", "Mid"] {
            ws.add(member(name));
        }
        let names: Vec<_> = ws.members().iter().map(MemberPackage::name).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn document_round_trip_uses_relative_paths() {
        let mut ws = container();
        ws.add(member("Feature"));
        ws.add(MemberPackage::new("Kit", "/shared/Kit", PackageKind::Folder));

        let doc = Value::Map(ws.to_document().unwrap());
        let entries = member_entries(&doc);
        assert_eq!(entries[0].as_map().unwrap()["path"], Value::from("Feature"));
        assert_eq!(entries[1].as_map().unwrap()["path"], Value::from("../shared/Kit"));

        let restored = WorkspaceContainer::from_document(ws.path(), &doc).unwrap();
        assert_eq!(restored, ws);
    }

    #[test]
    fn inspect_reports_missing_path() {
        let mut entry = ValueMap::new();
        entry.insert("name".into(), Value::from("Feature"));
        let mut root = ValueMap::new();
        root.insert("members".into(), Value::List(vec![Value::Map(entry)]));

        assert_eq!(
            inspect_document(Path::new("/work"), &Value::Map(root)),
            WorkspaceValidation::Invalid {
                reason: "member #1 is missing a path".into()
            }
        );
    }

    #[test]
    fn inspect_reports_duplicates_after_resolution() {
        let mut doc = ValueMap::new();
        let entry = |p: &str| {
            let mut m = ValueMap::new();
            m.insert("name".into(), Value::from("Feature"));
            m.insert("path".into(), Value::from(p));
            Value::Map(m)
        };
        doc.insert(
            "members".into(),
            Value::List(vec![entry("Feature"), entry("./Feature")]),
        );

        let result = inspect_document(Path::new("/work"), &Value::Map(doc));
        assert!(!result.is_valid());
    }

    #[test]
    fn inspect_counts_members_of_valid_document() {
        let mut ws = container();
        ws.add(member("A"));
        ws.add(member("B"));
        let doc = Value::Map(ws.to_document().unwrap());

        assert_eq!(
            inspect_document(ws.directory(), &doc),
            WorkspaceValidation::Valid { member_count: 2 }
        );
    }

    #[test]
    fn empty_document_is_valid_and_named_after_file() {
        let doc = Value::Map(ValueMap::new());
        let ws = WorkspaceContainer::from_document("/work/Modules.modworkspace", &doc).unwrap();
        assert_eq!(ws.name(), "Modules");
        assert!(ws.members().is_empty());
    }
}
