//! TOML document codec.

use modforge_core::{
    application::ports::DocumentCodec,
    domain::{Value, ValueMap},
};

/// Encodes configuration layers and workspace containers as TOML.
///
/// Datetimes have no counterpart in [`Value`] and decode to their string
/// form.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl TomlCodec {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentCodec for TomlCodec {
    fn decode(&self, text: &str) -> Result<ValueMap, String> {
        let table: toml::Table = toml::from_str(text).map_err(|e| e.message().to_string())?;
        Ok(table
            .into_iter()
            .map(|(key, value)| (key, from_toml(value)))
            .collect())
    }

    fn encode(&self, document: &ValueMap) -> Result<String, String> {
        let table: toml::Table = document
            .iter()
            .map(|(key, value)| (key.clone(), to_toml(value)))
            .collect();
        toml::to_string(&table).map_err(|e| e.to_string())
    }
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(key, value)| (key, from_toml(value)))
                .collect(),
        ),
    }
}

fn to_toml(value: &Value) -> toml::Value {
    match value {
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Integer(i) => toml::Value::Integer(*i),
        Value::Float(f) => toml::Value::Float(*f),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::List(items) => toml::Value::Array(items.iter().map(to_toml).collect()),
        Value::Map(map) => toml::Value::Table(
            map.iter()
                .map(|(key, value)| (key.clone(), to_toml(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_tables_and_lists() {
        let doc = TomlCodec
            .decode(
                r#"
author = "Ada"
platforms = ["ios@15", "macos@13"]
skipDependencyResolver = true

[customVariables]
team = "ios"
"#,
            )
            .unwrap();

        assert_eq!(doc["author"], Value::from("Ada"));
        assert_eq!(doc["platforms"], Value::string_list(["ios@15", "macos@13"]));
        assert_eq!(doc["skipDependencyResolver"], Value::Bool(true));
        assert_eq!(
            doc["customVariables"].as_map().unwrap()["team"],
            Value::from("ios")
        );
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = TomlCodec.decode("author = ").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn member_lists_encode_as_arrays_of_tables() {
        let mut member = ValueMap::new();
        member.insert("name".into(), Value::from("Feature"));
        member.insert("path".into(), Value::from("Feature"));
        member.insert("kind".into(), Value::from("package"));
        let mut doc = ValueMap::new();
        doc.insert("name".into(), Value::from("Modules"));
        doc.insert("members".into(), Value::List(vec![Value::Map(member)]));

        let text = TomlCodec.encode(&doc).unwrap();
        assert!(text.contains("[[members]]"), "{text}");
        assert_eq!(TomlCodec.decode(&text).unwrap(), doc);
    }
}
