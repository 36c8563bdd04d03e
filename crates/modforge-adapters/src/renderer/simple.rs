//! Simple variable substitution renderer.
//!
//! Two tag forms are understood:
//!
//! - `{{key}}` is replaced with the context value at `key` (dotted paths
//!   reach into maps). Lists render joined with `", "`.
//! - `{{@key}}` repeats the whole line once per item of the list at `key`.
//!   An empty list drops the line. A scalar renders the line once.
//!
//! Referencing a key the context does not hold is an error, so a typo in a
//! template never ships as literal braces.

use std::collections::BTreeMap;

use modforge_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{TemplateContext, Value},
    error::ModforgeResult,
};
use tracing::{debug, instrument};

use super::builtin;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const REPEAT: char = '@';

/// Renderer over a named set of template sources.
#[derive(Debug, Clone)]
pub struct SimpleRenderer {
    templates: BTreeMap<String, String>,
}

impl SimpleRenderer {
    /// Renderer preloaded with the built-in templates.
    pub fn new() -> Self {
        Self {
            templates: builtin::all()
                .into_iter()
                .map(|(name, source)| (name.to_string(), source.to_string()))
                .collect(),
        }
    }

    /// Renderer with no templates at all.
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// Add or replace templates. Later entries win.
    pub fn with_templates<I, K, V>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, source) in templates {
            let name = name.into();
            debug!(template = %name, "registering template");
            self.templates.insert(name, source.into());
        }
        self
    }

    /// Source of a template, if known.
    pub fn source(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }
}

impl Default for SimpleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip(self, context))]
    fn render(&self, template_name: &str, context: &TemplateContext) -> ModforgeResult<String> {
        let source =
            self.templates
                .get(template_name)
                .ok_or_else(|| ApplicationError::TemplateNotFound {
                    name: template_name.to_string(),
                    known: self.template_names(),
                })?;

        render_source(template_name, source, context)
    }

    fn template_names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

// ── Rendering ────────────────────────────────────────────────────────────────

fn render_source(name: &str, source: &str, context: &TemplateContext) -> ModforgeResult<String> {
    let mut out = String::with_capacity(source.len());

    for line in source.split_inclusive('\n') {
        match find_repeat_tag(name, line)? {
            Some((start, end, key)) => {
                let prefix = substitute(name, &line[..start], context)?;
                let suffix = substitute(name, &line[end..], context)?;
                for item in repeat_items(name, key, context)? {
                    out.push_str(&prefix);
                    out.push_str(&item);
                    out.push_str(&suffix);
                }
            }
            None => out.push_str(&substitute(name, line, context)?),
        }
    }

    Ok(out)
}

/// Byte range and key of the first `{{@key}}` tag on `line`.
fn find_repeat_tag<'a>(name: &str, line: &'a str) -> ModforgeResult<Option<(usize, usize, &'a str)>> {
    let marker = format!("{OPEN}{REPEAT}");
    let Some(start) = line.find(&marker) else {
        return Ok(None);
    };
    let body_start = start + marker.len();
    let close = line[body_start..]
        .find(CLOSE)
        .ok_or_else(|| unclosed(name, line))?;
    let key = line[body_start..body_start + close].trim();
    Ok(Some((start, body_start + close + CLOSE.len(), key)))
}

fn repeat_items(name: &str, key: &str, context: &TemplateContext) -> ModforgeResult<Vec<String>> {
    match context.get(key) {
        Some(Value::List(items)) => Ok(items.iter().map(ToString::to_string).collect()),
        Some(other) => Ok(vec![other.to_string()]),
        None => Err(unknown_variable(name, key)),
    }
}

fn substitute(name: &str, text: &str, context: &TemplateContext) -> ModforgeResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let close = after.find(CLOSE).ok_or_else(|| unclosed(name, text))?;
        let key = after[..close].trim();
        let value = context
            .get_text(key)
            .ok_or_else(|| unknown_variable(name, key))?;
        out.push_str(&value);
        rest = &after[close + CLOSE.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

fn unknown_variable(name: &str, key: &str) -> modforge_core::error::ModforgeError {
    ApplicationError::RenderingFailed {
        reason: format!("template '{name}' uses unknown variable '{key}'"),
    }
    .into()
}

fn unclosed(name: &str, line: &str) -> modforge_core::error::ModforgeError {
    ApplicationError::RenderingFailed {
        reason: format!("template '{name}' has an unclosed tag in: {}", line.trim_end()),
    }
    .into()
}
