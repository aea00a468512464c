//! Encoded attribute sets parse back to the values they were built from

use blueprint_core::backends::nix::{encode_attr_set, quote};
use blueprint_core::CollectedValues;
use serde_json::{json, Map, Number, Value};
use std::iter::Peekable;
use std::str::Chars;

/// Parser for the attribute-set subset the encoder emits
struct NixReader<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> NixReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn expect(&mut self, want: char) {
        self.skip_ws();
        assert_eq!(self.chars.next(), Some(want), "expected '{}'", want);
    }

    fn value(&mut self) -> Value {
        self.skip_ws();
        match self.chars.peek().copied() {
            Some('{') => Value::Object(self.attrs()),
            Some('[') => self.list(),
            Some('"') => Value::String(self.string()),
            Some('(') => {
                self.expect('(');
                let inner = self.value();
                self.expect(')');
                inner
            }
            Some(c) if c.is_ascii_digit() || c == '-' => self.number(),
            _ => match self.ident().as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "null" => Value::Null,
                other => panic!("unexpected token {:?}", other),
            },
        }
    }

    fn attrs(&mut self) -> Map<String, Value> {
        self.expect('{');
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.chars.peek() == Some(&'}') {
                self.chars.next();
                return map;
            }
            let key = if self.chars.peek() == Some(&'"') {
                self.string()
            } else {
                self.ident()
            };
            self.expect('=');
            let value = self.value();
            self.expect(';');
            map.insert(key, value);
        }
    }

    fn list(&mut self) -> Value {
        self.expect('[');
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.chars.peek() == Some(&']') {
                self.chars.next();
                return Value::Array(items);
            }
            items.push(self.value());
        }
    }

    fn string(&mut self) -> String {
        self.expect('"');
        let mut out = String::new();
        loop {
            match self.chars.next().expect("unterminated string") {
                '"' => return out,
                '\\' => match self.chars.next().expect("dangling escape") {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    other => out.push(other),
                },
                '$' if self.chars.peek() == Some(&'{') => {
                    panic!("unescaped interpolation in string literal")
                }
                c => out.push(c),
            }
        }
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '\'') {
                out.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        out
    }

    fn number(&mut self) -> Value {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if let Ok(int) = text.parse::<i64>() {
            Value::Number(int.into())
        } else {
            let float: f64 = text.parse().expect("number literal");
            Value::Number(Number::from_f64(float).expect("finite float"))
        }
    }
}

fn parse(text: &str) -> Value {
    Value::Object(NixReader::new(text).attrs())
}

/// Equality that also requires the same key order
fn assert_same(left: &Value, right: &Value) {
    assert_eq!(left, right);
    assert_eq!(left.to_string(), right.to_string());
}

#[test]
fn nested_values_round_trip_in_insertion_order() {
    let mut values = CollectedValues::new();
    values.insert_path("projectName", "my-service");
    values.insert_path("useDocker", true);
    values.insert_path("replicas", 3);
    values.insert_path("ratio", 0.25);
    values.insert_path("offset", -7);
    values.insert_path("db.host", "localhost");
    values.insert_path("db.port", 5432);
    values.insert_path("db.options.ssl", false);
    values.insert_path("features", json!(["api", "worker"]));
    values.insert_path("deltas", json!([-1, 2, -0.5]));
    values.insert_path("zeta", "last");
    values.insert_path("alpha", "after zeta");

    let encoded = encode_attr_set(values.as_map());
    assert_same(&parse(&encoded), &values.into_value());
}

#[test]
fn awkward_strings_round_trip() {
    let samples = [
        r#"say "hello""#,
        r"C:\Users\dev",
        "${builtins.currentSystem}",
        "cost: $5 and ${ x }",
        "line one\nline two\r\n\ttabbed",
        "trailing backslash \\",
        "unicode: ação 🚀",
        "",
    ];

    for sample in samples {
        let quoted = quote(sample);
        let mut reader = NixReader::new(&quoted);
        assert_eq!(reader.string(), sample);
    }
}

#[test]
fn awkward_keys_round_trip() {
    let map = json!({
        "with space": 1,
        "let": "keyword",
        "dotted.key": true,
        "9lives": "leading digit",
        "quote\"d": "q",
        "snake_case-and'prime": "plain"
    });
    let Value::Object(map) = map else {
        unreachable!()
    };

    let encoded = encode_attr_set(&map);
    assert!(encoded.contains("snake_case-and'prime = \"plain\";"));
    assert!(encoded.contains("\"let\" = \"keyword\";"));
    assert_same(&parse(&encoded), &Value::Object(map));
}

#[test]
fn empty_set_round_trips() {
    assert_same(&parse(&encode_attr_set(&Map::new())), &json!({}));
}
