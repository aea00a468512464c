//! Schema-driven input collection
//!
//! The core walks the schema; rendering prompts and reading answers is the
//! job of a [`Prompter`] supplied by the caller (the cliclack UI, or a
//! scripted one in tests).

use crate::error::{Result, ScaffoldError};
use crate::templates::{CollectedValues, ConfigSchema, FieldKind, FieldSpec};
use serde_json::Value;
use std::io;

/// Interactive primitives the core needs from a UI
///
/// Every question returns `Ok(None)` when the user gave no input, in which
/// case the field's default applies. An `Err` of kind `Interrupted` means
/// the user cancelled.
pub trait Prompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> io::Result<Option<String>>;

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<Option<bool>>;

    fn select(
        &mut self,
        prompt: &str,
        choices: &[String],
        default: Option<&str>,
    ) -> io::Result<Option<String>>;

    fn multiselect(
        &mut self,
        prompt: &str,
        choices: &[String],
        defaults: &[String],
    ) -> io::Result<Option<Vec<String>>>;

    /// Show what is about to be built and ask to proceed
    fn confirm_build(&mut self, template: &str, summary: &[(String, String)]) -> io::Result<bool>;
}

/// Ask for every field of `schema`, in order, and store answers at their destination paths
///
/// With no input a field takes its default. Without a default, strings
/// become `""`, booleans `false`, multi-choice `[]`, and a single choice is
/// left out.
pub fn collect_values<P: Prompter + ?Sized>(
    schema: &ConfigSchema,
    prompter: &mut P,
) -> Result<CollectedValues> {
    let mut values = CollectedValues::new();

    for field in &schema.fields {
        if let Some(value) = ask(field, prompter).map_err(|e| collection_error(field, e))? {
            values.insert_path(&field.destination, value);
        }
    }

    tracing::debug!(fields = schema.len(), "collected template values");
    Ok(values)
}

fn ask<P: Prompter + ?Sized>(field: &FieldSpec, prompter: &mut P) -> io::Result<Option<Value>> {
    let value = match &field.kind {
        FieldKind::String { default } => {
            let answer = prompter
                .input(&field.prompt, default.as_deref())?
                .filter(|s| !s.is_empty());
            Some(Value::String(
                answer.or_else(|| default.clone()).unwrap_or_default(),
            ))
        }
        FieldKind::Boolean { default } => {
            let fallback = default.unwrap_or(false);
            let answer = prompter.confirm(&field.prompt, fallback)?;
            Some(Value::Bool(answer.unwrap_or(fallback)))
        }
        FieldKind::SingleChoice { choices, default } => prompter
            .select(&field.prompt, choices, default.as_deref())?
            .filter(|c| choices.contains(c))
            .or_else(|| default.clone())
            .map(Value::String),
        FieldKind::MultiChoice { choices, default } => {
            let picked = prompter
                .multiselect(&field.prompt, choices, default)?
                .map(|picked| {
                    picked
                        .into_iter()
                        .filter(|c| choices.contains(c))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_else(|| default.clone());
            Some(Value::Array(picked.into_iter().map(Value::String).collect()))
        }
    };
    Ok(value)
}

fn collection_error(field: &FieldSpec, e: io::Error) -> ScaffoldError {
    if e.kind() == io::ErrorKind::Interrupted {
        ScaffoldError::Collection("cancelled by user".to_string())
    } else {
        ScaffoldError::Collection(format!("field '{}': {}", field.name, e))
    }
}
