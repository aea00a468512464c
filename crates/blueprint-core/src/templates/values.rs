//! Collected configuration values

use serde_json::{Map, Value};

/// Values collected for one build, keyed by destination path
///
/// Dotted paths expand into nested objects: inserting `db.host` yields
/// `{"db": {"host": ...}}`. Key order is insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedValues(Map<String, Value>);

impl CollectedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Store `value` under a dotted `path`, merging into existing objects
    ///
    /// Siblings already present under a shared prefix are kept. A non-object
    /// value sitting where an object is needed is replaced.
    pub fn insert_path(&mut self, path: &str, value: impl Into<Value>) {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.0;
        for segment in parents {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made an object"),
            };
        }
        current.insert(last.to_string(), value.into());
    }

    /// Look up a dotted path
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let segments = split_path(path);
        let (last, parents) = segments.split_last()?;
        let mut current = &self.0;
        for segment in parents {
            current = current.get(*segment)?.as_object()?;
        }
        current.get(*last)
    }

    /// Flattened `(dotted.path, display value)` rows for a summary table
    pub fn summary_rows(&self) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        flatten_into(&self.0, "", &mut rows);
        rows
    }

    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for CollectedValues {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Split on '.'; a path with empty segments is kept whole as a single key
fn split_path(path: &str) -> Vec<&str> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        vec![path]
    } else {
        segments
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, rows: &mut Vec<(String, String)>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(nested) => flatten_into(nested, &path, rows),
            other => rows.push((path, display_value(other))),
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
