//! Typed configuration and context values.
//!
//! [`Value`] is the single currency shared by configuration layers, the
//! workspace document and the template context. Nested settings are addressed
//! with dotted key paths (`a.b.c`); traversal is explicit, there is no
//! reflection-style field lookup anywhere in the crate.
//!
//! Merge semantics used by [`deep_merge`]:
//! - Maps: deep-merge by key
//! - Lists: replaced by the higher layer
//! - Scalars: replaced by the higher layer

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Ordered string-keyed mapping of values.
pub type ValueMap = BTreeMap<String, Value>;

/// A configuration or context value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    /// Human-readable type name used in [`DomainError::ConfigKey`].
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Build a list of strings.
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(|s| Self::String(s.into())).collect())
    }

    /// Split a comma-separated scalar into a trimmed string list.
    ///
    /// Empty segments are dropped, so `""` yields an empty list.
    pub fn from_comma_separated(raw: &str) -> Self {
        Self::List(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Self::String(s.to_string()))
                .collect(),
        )
    }

    /// Coerce a raw command-line string using `schema` as the declared type.
    ///
    /// Only two coercions exist: list-typed keys split on commas, bool-typed
    /// keys accept `true`/`false`. Everything else stays a string.
    pub fn coerce_scalar(raw: &str, schema: Option<&Value>) -> Self {
        match schema {
            Some(Self::List(_)) => Self::from_comma_separated(raw),
            Some(Self::Bool(_)) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Self::Bool(true),
                "false" => Self::Bool(false),
                _ => Self::String(raw.to_string()),
            },
            _ => Self::String(raw.to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Self::Map(map)
    }
}

/// Lists render as `a, b` so the output round-trips through
/// [`Value::from_comma_separated`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k} = {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ── Dotted paths ─────────────────────────────────────────────────────────────

/// Split a dotted key path, rejecting empty segments (`a..b`, `.a`, `a.`).
pub fn split_key_path(path: &str) -> Result<Vec<&str>, DomainError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(DomainError::InvalidKeyPath { path: path.into() });
    }
    Ok(segments)
}

/// Look up a dotted path. Absent on any missing segment or malformed path.
pub fn get_path<'a>(map: &'a ValueMap, path: &str) -> Option<&'a Value> {
    let segments = split_key_path(path).ok()?;
    let (last, parents) = segments.split_last()?;

    let mut current = map;
    for segment in parents {
        current = current.get(*segment)?.as_map()?;
    }
    current.get(*last)
}

/// Set a dotted path, creating intermediate maps as needed.
///
/// Fails if an intermediate segment already holds a non-map value.
pub fn set_path(map: &mut ValueMap, path: &str, value: Value) -> Result<(), DomainError> {
    let segments = split_key_path(path)?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(DomainError::InvalidKeyPath { path: path.into() });
    };

    let mut current = map;
    for segment in parents {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Map(ValueMap::new()));
        current = match entry {
            Value::Map(inner) => inner,
            _ => return Err(DomainError::InvalidKeyPath { path: path.into() }),
        };
    }
    current.insert((*last).to_string(), value);
    Ok(())
}

/// Remove a dotted path, returning the removed value.
pub fn remove_path(map: &mut ValueMap, path: &str) -> Option<Value> {
    let segments = split_key_path(path).ok()?;
    let (last, parents) = segments.split_last()?;

    let mut current = map;
    for segment in parents {
        current = match current.get_mut(*segment)? {
            Value::Map(inner) => inner,
            _ => return None,
        };
    }
    current.remove(*last)
}

/// Flatten nested maps into `dotted.path -> display string`.
///
/// Lists are leaves. An empty map is kept as a `{}` leaf so that the key
/// remains visible.
pub fn flatten(map: &ValueMap) -> BTreeMap<String, String> {
    fn walk(prefix: &str, map: &ValueMap, out: &mut BTreeMap<String, String>) {
        for (key, value) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                Value::Map(inner) if !inner.is_empty() => walk(&path, inner, out),
                other => {
                    out.insert(path, other.to_string());
                }
            }
        }
    }

    let mut out = BTreeMap::new();
    walk("", map, &mut out);
    out
}

/// Deep merge two values, `overlay` winning.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Map(mut base_map), Value::Map(overlay_map)) => {
            merge_maps(&mut base_map, overlay_map);
            Value::Map(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// In-place deep merge of `overlay` into `base`.
pub fn merge_maps(base: &mut ValueMap, overlay: ValueMap) {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, Value)]) -> ValueMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn get_path_traverses_nested_maps() {
        let inner = map(&[("c", Value::from("deep"))]);
        let middle = map(&[("b", Value::Map(inner))]);
        let root = map(&[("a", Value::Map(middle))]);

        assert_eq!(get_path(&root, "a.b.c"), Some(&Value::from("deep")));
        assert_eq!(get_path(&root, "a.x.c"), None);
        assert_eq!(get_path(&root, "a.b.c.d"), None);
        assert_eq!(get_path(&root, "a..b"), None);
    }

    #[test]
    fn set_path_creates_intermediate_maps() {
        let mut root = ValueMap::new();
        set_path(&mut root, "customVariables.team", "ios".into()).unwrap();

        assert_eq!(
            get_path(&root, "customVariables.team"),
            Some(&Value::from("ios"))
        );
    }

    #[test]
    fn set_path_refuses_to_descend_through_scalar() {
        let mut root = map(&[("author", Value::from("Ada"))]);
        let err = set_path(&mut root, "author.name", "x".into()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidKeyPath { .. }));
    }

    #[test]
    fn remove_path_removes_leaf_only() {
        let mut root = ValueMap::new();
        set_path(&mut root, "a.b", Value::Bool(true)).unwrap();
        set_path(&mut root, "a.c", Value::Bool(false)).unwrap();

        assert_eq!(remove_path(&mut root, "a.b"), Some(Value::Bool(true)));
        assert_eq!(get_path(&root, "a.c"), Some(&Value::Bool(false)));
        assert_eq!(remove_path(&mut root, "a.missing"), None);
    }

    #[test]
    fn comma_separated_split_trims_and_drops_empty() {
        assert_eq!(
            Value::from_comma_separated("PackageA, PackageB ,,"),
            Value::string_list(["PackageA", "PackageB"])
        );
        assert_eq!(Value::from_comma_separated(""), Value::List(vec![]));
    }

    #[test]
    fn coercion_follows_schema_only() {
        let list_schema = Value::List(vec![]);
        let bool_schema = Value::Bool(false);

        assert_eq!(
            Value::coerce_scalar("a,b", Some(&list_schema)),
            Value::string_list(["a", "b"])
        );
        assert_eq!(
            Value::coerce_scalar("TRUE", Some(&bool_schema)),
            Value::Bool(true)
        );
        // No schema: no inference.
        assert_eq!(Value::coerce_scalar("true", None), Value::from("true"));
        assert_eq!(Value::coerce_scalar("a,b", None), Value::from("a,b"));
    }

    #[test]
    fn deep_merge_overrides_scalars_and_replaces_lists() {
        let base = Value::Map(map(&[
            ("flag", Value::Bool(false)),
            ("list", Value::string_list(["a", "b"])),
            ("nested", Value::Map(map(&[("keep", Value::from("k"))]))),
        ]));
        let overlay = Value::Map(map(&[
            ("flag", Value::Bool(true)),
            ("list", Value::string_list(["x"])),
            ("nested", Value::Map(map(&[("new", Value::from("n"))]))),
        ]));

        let Value::Map(merged) = deep_merge(base, overlay) else {
            panic!("expected map");
        };
        assert_eq!(merged["flag"], Value::Bool(true));
        assert_eq!(merged["list"], Value::string_list(["x"]));
        assert_eq!(get_path(&merged, "nested.keep"), Some(&Value::from("k")));
        assert_eq!(get_path(&merged, "nested.new"), Some(&Value::from("n")));
    }

    #[test]
    fn flatten_includes_nested_and_list_entries() {
        let mut root = ValueMap::new();
        set_path(&mut root, "author", "Ada".into()).unwrap();
        set_path(&mut root, "custom.team", "ios".into()).unwrap();
        set_path(&mut root, "exclusions", Value::string_list(["A", "B"])).unwrap();
        set_path(&mut root, "empty", Value::Map(ValueMap::new())).unwrap();

        let flat = flatten(&root);
        assert_eq!(flat["author"], "Ada");
        assert_eq!(flat["custom.team"], "ios");
        assert_eq!(flat["exclusions"], "A, B");
        assert_eq!(flat["empty"], "{}");
    }
}
