//! Nix flake templates
//!
//! Collected values become a Nix attribute set passed to the flake package
//! named after the template. `nix build` only produces a store path, so the
//! output is copied into the project directory afterwards.

use super::copier::copy_tree;
use crate::error::{Result, ScaffoldError};
use crate::runtime::{probe_tool, CommandRunner, Invocation};
use crate::templates::TemplateDescriptor;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

pub const NIX_TOOL: &str = "nix";

const NIX_KEYWORDS: &[&str] = &[
    "if", "then", "else", "assert", "with", "let", "in", "rec", "inherit", "or",
];

pub struct NixBackend {
    descriptor: Arc<TemplateDescriptor>,
    runner: Arc<dyn CommandRunner>,
}

impl NixBackend {
    pub fn new(descriptor: Arc<TemplateDescriptor>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { descriptor, runner }
    }

    /// True when `nix --version` runs and exits zero
    pub fn check_availability(&self) -> Result<bool> {
        let info = probe_tool(self.runner.as_ref(), NIX_TOOL)
            .map_err(|e| ScaffoldError::io(format!("failed to probe `{}`", NIX_TOOL), e))?;
        if let Some(version) = &info.version {
            tracing::debug!(%version, "nix is available");
        }
        Ok(info.available)
    }

    /// Full expression handed to `nix build --expr`
    pub fn build_expression(&self, attr_set: &str) -> String {
        let d = &self.descriptor;
        format!(
            r#"with import <nixpkgs> {{}};
let
  template = builtins.getFlake "github:{org}/{repo}?ref={branch}";
  args = {args};
in
  template.packages.${{builtins.currentSystem}}.{name} args
"#,
            org = d.organization,
            repo = d.repository,
            branch = d.branch,
            args = indent_continuation(attr_set, "  "),
            name = attr_name(&d.name),
        )
    }

    pub fn build(&self, attr_set: &str, output_dir: &Path) -> Result<()> {
        let name = &self.descriptor.name;
        let invocation = Invocation::new(NIX_TOOL).args([
            "build".to_string(),
            "--impure".to_string(),
            "--no-link".to_string(),
            "--print-out-paths".to_string(),
            "--expr".to_string(),
            self.build_expression(attr_set),
        ]);

        let out = self
            .runner
            .run(&invocation)
            .map_err(|e| ScaffoldError::build(name, format!("failed to run nix: {}", e)))?;

        if !out.success {
            let diagnostic = if out.stderr.trim().is_empty() {
                out.diagnostic()
            } else {
                out.stderr.clone()
            };
            return Err(ScaffoldError::build(name, diagnostic));
        }

        let store_path = out
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| ScaffoldError::build(name, "nix build printed no output path"))?;
        tracing::info!(store_path, output_dir = %output_dir.display(), "copying nix build output");

        let copied = copy_tree(Path::new(store_path), output_dir).map_err(|e| {
            ScaffoldError::build(
                name,
                format!(
                    "failed to copy {} into {}: {}",
                    store_path,
                    output_dir.display(),
                    e
                ),
            )
        })?;
        tracing::debug!(files = copied, "nix output copied");
        Ok(())
    }
}

/// Render a mapping as a Nix attribute set literal, keys in insertion order
pub fn encode_attr_set(map: &Map<String, Value>) -> String {
    render_attrs(map, 0)
}

fn render_attrs(map: &Map<String, Value>, depth: usize) -> String {
    if map.is_empty() {
        return "{ }".to_string();
    }
    let pad = "  ".repeat(depth + 1);
    let mut out = String::from("{\n");
    for (key, value) in map {
        out.push_str(&pad);
        out.push_str(&attr_name(key));
        out.push_str(" = ");
        out.push_str(&render_value(value, depth + 1));
        out.push_str(";\n");
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
    out
}

fn render_value(value: &Value, depth: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) if items.is_empty() => "[ ]".to_string(),
        Value::Array(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| match item {
                    // List elements cannot start with unary minus
                    Value::Number(n) if n.to_string().starts_with('-') => format!("({})", n),
                    _ => render_value(item, depth),
                })
                .collect();
            format!("[ {} ]", rendered.join(" "))
        }
        Value::Object(map) => render_attrs(map, depth),
    }
}

/// Quote a string literal, escaping `"`, `\`, `${` and control characters
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Attribute names that aren't plain identifiers are emitted quoted
fn attr_name(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '\''))
        && !NIX_KEYWORDS.contains(&key)
}

fn indent_continuation(text: &str, pad: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
