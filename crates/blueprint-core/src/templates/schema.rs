//! Per-template configuration schema
//!
//! A schema document maps field names to field specifications:
//!
//! ```yaml
//! projectName:
//!   type: string
//!   prompt: What is the project name?
//!   default: my-project
//! database:
//!   type: singleChoice
//!   choices: [postgres, sqlite]
//!   option: db.engine
//! ```
//!
//! Free-form `type` strings are resolved into [`FieldKind`] once, here, so
//! collection code never branches on raw strings. A single-choice field
//! whose two choices read as yes and no (`[Sim, Não]`) is a boolean.

use crate::error::{Result, ScaffoldError};
use serde::Deserialize;

/// Field type, with its default and choices in the shape that type needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String { default: Option<String> },
    Boolean { default: Option<bool> },
    SingleChoice { choices: Vec<String>, default: Option<String> },
    MultiChoice { choices: Vec<String>, default: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub prompt: String,
    /// Dotted path the collected value is stored under
    pub destination: String,
}

/// Ordered set of fields for one template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSchema {
    pub fields: Vec<FieldSpec>,
    /// Fields dropped while parsing, with the reason
    pub skipped: Vec<(String, String)>,
}

/// A field exactly as written in the schema document
#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    default: Option<serde_yaml::Value>,
    #[serde(default, alias = "list")]
    choices: Option<Vec<serde_yaml::Value>>,
    #[serde(default, alias = "destinationPath")]
    option: Option<String>,
}

impl ConfigSchema {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Parse a schema document; empty or `null` documents give an empty schema
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let doc: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ScaffoldError::retrieval("template schema", e))?;

        let mapping = match doc {
            serde_yaml::Value::Null => return Ok(Self::default()),
            serde_yaml::Value::Mapping(mapping) => mapping,
            other => {
                return Err(ScaffoldError::retrieval(
                    "template schema",
                    format!("expected a mapping of fields, found {}", yaml_type_name(&other)),
                ))
            }
        };

        let mut schema = Self::default();
        for (key, value) in mapping {
            let Some(name) = scalar_to_string(&key) else {
                schema.skip("<non-scalar key>", "field names must be scalars");
                continue;
            };

            let raw: RawField = match serde_yaml::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    schema.skip(&name, format!("malformed field: {}", e));
                    continue;
                }
            };

            match parse_field(&name, raw) {
                Ok(field) => schema.fields.push(field),
                Err(reason) => schema.skip(&name, reason),
            }
        }

        Ok(schema)
    }

    fn skip(&mut self, name: &str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(field = name, reason = %reason, "skipping schema field");
        self.skipped.push((name.to_string(), reason));
    }
}

fn parse_field(name: &str, raw: RawField) -> std::result::Result<FieldSpec, String> {
    let type_name = raw.kind.as_deref().unwrap_or("string");
    let choices = || -> Vec<String> {
        raw.choices
            .iter()
            .flatten()
            .filter_map(scalar_to_string)
            .collect()
    };

    let kind = match type_name {
        "string" | "input" | "text" => FieldKind::String {
            default: raw.default.as_ref().and_then(scalar_to_string),
        },
        "boolean" | "bool" | "confirm" => FieldKind::Boolean {
            default: raw.default.as_ref().and_then(yaml_to_bool),
        },
        "singleChoice" | "choose" | "radio" | "select" => {
            let choices = choices();
            if choices.is_empty() {
                return Err("choice field has no choices".to_string());
            }
            if is_yes_no(&choices) {
                return Ok(field(
                    name,
                    raw.prompt,
                    raw.option,
                    FieldKind::Boolean {
                        default: raw.default.as_ref().and_then(yaml_to_bool),
                    },
                ));
            }
            FieldKind::SingleChoice {
                default: raw
                    .default
                    .as_ref()
                    .and_then(scalar_to_string)
                    .filter(|d| choices.contains(d)),
                choices,
            }
        }
        "multiChoice" | "checkbox" | "multiselect" => {
            let choices = choices();
            if choices.is_empty() {
                return Err("choice field has no choices".to_string());
            }
            let default = match &raw.default {
                Some(serde_yaml::Value::Sequence(items)) => {
                    items.iter().filter_map(scalar_to_string).collect()
                }
                Some(value) => scalar_to_string(value)
                    .filter(|s| !s.is_empty())
                    .into_iter()
                    .collect(),
                None => Vec::new(),
            };
            FieldKind::MultiChoice {
                default: default
                    .into_iter()
                    .filter(|d: &String| choices.contains(d))
                    .collect(),
                choices,
            }
        }
        other => return Err(format!("unsupported field type '{}'", other)),
    };

    Ok(field(name, raw.prompt, raw.option, kind))
}

fn field(name: &str, prompt: Option<String>, option: Option<String>, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        prompt: prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| name.to_string()),
        destination: option
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| name.to_string()),
        kind,
    }
}

/// Exactly two choices, one reading as yes and the other as no
fn is_yes_no(choices: &[String]) -> bool {
    let answers: Vec<Option<bool>> = choices
        .iter()
        .map(|c| yaml_to_bool(&serde_yaml::Value::String(c.clone())))
        .collect();
    matches!(
        answers.as_slice(),
        [Some(true), Some(false)] | [Some(false), Some(true)]
    )
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn yaml_to_bool(value: &serde_yaml::Value) -> Option<bool> {
    match value {
        serde_yaml::Value::Bool(b) => Some(*b),
        serde_yaml::Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "sim" | "s" => Some(true),
            "false" | "no" | "n" | "não" | "nao" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
