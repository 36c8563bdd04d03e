//! Lexical path arithmetic.
//!
//! Everything here is pure: no filesystem access and no dependence on the
//! process working directory. Callers canonicalize through the
//! `Filesystem` port first when symlinks matter.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::DomainError;

/// A filesystem path guaranteed to be relative.
///
/// Invariant: Never absolute. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() || path.has_root() {
            Err(DomainError::RelativePathRequired {
                path: path.display().to_string(),
            })
        } else {
            Ok(Self(path))
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Segments joined with `/`, regardless of host separator. This is the
    /// form written into manifests and workspace containers.
    pub fn to_portable_string(&self) -> String {
        let segments: Vec<String> = self
            .0
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if segments.is_empty() {
            ".".to_string()
        } else {
            segments.join("/")
        }
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_portable_string())
    }
}

/// Resolve `.` and `..` lexically. `..` never climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = out.parent().is_none() && out.has_root();
                let ends_in_parent =
                    matches!(out.components().next_back(), Some(Component::ParentDir));
                if out.as_os_str().is_empty() || ends_in_parent {
                    out.push("..");
                } else if !at_root {
                    out.pop();
                }
            }
            Component::Normal(segment) => out.push(segment),
        }
    }
    out
}

/// Shortest relative path from directory `from` to `to`.
///
/// Both inputs must be absolute. The result is computed from the longest
/// common segment prefix: one `..` for every remaining segment of `from`,
/// followed by the remaining segments of `to`. Identical paths yield `.`.
pub fn relative_path(from: &Path, to: &Path) -> Result<RelativePath, DomainError> {
    for path in [from, to] {
        if !path.is_absolute() {
            return Err(DomainError::AbsolutePathRequired {
                path: path.display().to_string(),
            });
        }
    }

    let from = normalize(from);
    let to = normalize(to);
    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    // Windows drives: nothing in common means no relative route exists.
    if common == 0 {
        return Err(DomainError::UnrelatedPaths {
            from: from.display().to_string(),
            to: to.display().to_string(),
        });
    }

    let mut relative = PathBuf::new();
    for _ in common..from_parts.len() {
        relative.push("..");
    }
    for part in &to_parts[common..] {
        relative.push(part.as_os_str());
    }

    RelativePath::try_new(relative)
}

/// Last path segment as a UTF-8 name.
pub fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(from: &str, to: &str) -> String {
        relative_path(Path::new(from), Path::new(to))
            .unwrap()
            .to_portable_string()
    }

    #[test]
    fn sibling_packages() {
        assert_eq!(rel("/work/Modules/Feature", "/work/Modules/Awesome"), "../Awesome");
    }

    #[test]
    fn deeply_nested_target() {
        assert_eq!(
            rel("/work/Modules/Features/Login", "/work/Shared/Kit"),
            "../../../Shared/Kit"
        );
    }

    #[test]
    fn descendant_and_identical() {
        assert_eq!(rel("/work", "/work/Modules/Core"), "Modules/Core");
        assert_eq!(rel("/work/Core", "/work/Core"), ".");
    }

    #[test]
    fn dots_are_normalized_first() {
        assert_eq!(rel("/work/./Modules/../Modules/Feature", "/work/Kit/."), "../../Kit");
    }

    #[test]
    fn relative_inputs_are_rejected() {
        assert!(matches!(
            relative_path(Path::new("work"), Path::new("/work")),
            Err(DomainError::AbsolutePathRequired { .. })
        ));
        assert!(relative_path(Path::new("/work"), Path::new("Kit")).is_err());
    }

    #[test]
    fn relative_path_round_trips() {
        let cases = [
            ("/a/b/c", "/a/d/e"),
            ("/a", "/a/b/c"),
            ("/a/b/c", "/a"),
            ("/x/y", "/p/q/r"),
            ("/same", "/same"),
        ];
        for (from, to) in cases {
            let relative = relative_path(Path::new(from), Path::new(to)).unwrap();
            let recombined = normalize(&Path::new(from).join(relative.as_path()));
            assert_eq!(recombined, normalize(Path::new(to)), "{from} -> {to}");
        }
    }

    #[test]
    fn relative_path_is_pure() {
        let first = rel("/a/b", "/a/c");
        let _ = rel("/z", "/y");
        assert_eq!(rel("/a/b", "/a/c"), first);
    }

    #[test]
    fn normalize_does_not_climb_above_root() {
        assert_eq!(normalize(Path::new("/../a/./b/..")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
    }

    #[test]
    fn relative_path_rejects_absolute_construction() {
        assert!(matches!(
            RelativePath::try_new("/abs"),
            Err(DomainError::RelativePathRequired { .. })
        ));
        assert!(RelativePath::try_new("Sources/Core").is_ok());
    }
}
