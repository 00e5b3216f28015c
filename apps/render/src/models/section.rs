//! Section values: the polymorphic body of one resume section, classified once
//! at the input boundary so renderers never inspect raw JSON shapes.

use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// One structured entry inside a record list (an education row, a project...).
/// Key order is preserved from the input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Text of a field, or `""` when missing or null.
    pub fn text(&self, key: &str) -> String {
        self.0.get(key).map(value_to_text).unwrap_or_default()
    }

    /// Text of the first key whose value is non-blank.
    pub fn first_text(&self, keys: &[&str]) -> String {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !is_blank(v))
            .map(value_to_text)
            .unwrap_or_default()
    }

    /// A field as a list of strings. A bare string counts as a one-item list.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.0.get(key).map(value_to_list).unwrap_or_default()
    }

    /// List of the first key whose value is non-blank.
    pub fn first_list(&self, keys: &[&str]) -> Vec<String> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !is_blank(v))
            .map(value_to_list)
            .unwrap_or_default()
    }

    /// Non-blank fields in input order, rendered as text.
    pub fn filled_fields(&self) -> impl Iterator<Item = (&str, String)> {
        self.0
            .iter()
            .filter(|(_, v)| !is_blank(v))
            .map(|(k, v)| (k.as_str(), value_to_text(v)))
    }
}

/// Layout family of a record list, decided from the key set of its first record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Education / experience: institution or company, location, date.
    Entry,
    /// Name plus technologies or description.
    Project,
    /// Name plus issuer.
    Certification,
    /// Organization or role, plus date.
    Leadership,
    Generic,
}

impl RecordKind {
    /// Classifies a record by key set only. Priority order matters: a record
    /// with `name`, `description` and `issuer` is a project.
    pub fn classify(record: &Record) -> Self {
        let has = |k: &str| record.has(k);

        if (has("institution") || has("company")) && has("location") && has("date") {
            RecordKind::Entry
        } else if has("name") && (has("technologies") || has("description")) {
            RecordKind::Project
        } else if has("name") && has("issuer") {
            RecordKind::Certification
        } else if (has("organization") || has("role")) && has("date") {
            RecordKind::Leadership
        } else {
            RecordKind::Generic
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section values
// ────────────────────────────────────────────────────────────────────────────

/// A named group inside a categorized section (e.g. "Languages": [Rust, Go]).
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionValue {
    Text(String),
    StringList(Vec<String>),
    RecordList(Vec<Record>),
    Categorized(Vec<Category>),
    /// Any other object, kept as ordered key/value text pairs.
    Generic(Vec<(String, String)>),
}

impl SectionValue {
    /// Classifies a raw JSON value by shape. Returns `None` for empty values
    /// (null, empty string, empty list, empty object) so they are skipped.
    pub fn from_json(value: &Value) -> Option<Self> {
        if is_blank(value) {
            return None;
        }

        let section = match value {
            Value::String(s) => SectionValue::Text(s.clone()),
            Value::Number(_) | Value::Bool(_) => SectionValue::Text(value_to_text(value)),
            Value::Array(items) => match items.first() {
                Some(Value::Object(_)) => SectionValue::RecordList(
                    items
                        .iter()
                        .filter_map(|item| item.as_object().cloned().map(Record::new))
                        .collect(),
                ),
                _ => SectionValue::StringList(
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect(),
                ),
            },
            Value::Object(map) if map.contains_key("categories") => SectionValue::Categorized(
                map.get("categories")
                    .and_then(Value::as_array)
                    .map(|cats| cats.iter().filter_map(parse_category).collect())
                    .unwrap_or_default(),
            ),
            Value::Object(map) => SectionValue::Generic(
                map.iter()
                    .map(|(k, v)| (k.clone(), value_to_text(v)))
                    .collect(),
            ),
            Value::Null => return None,
        };

        (!section.is_empty()).then_some(section)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SectionValue::Text(s) => s.is_empty(),
            SectionValue::StringList(items) => items.is_empty(),
            SectionValue::RecordList(records) => records.is_empty(),
            SectionValue::Categorized(cats) => cats.is_empty(),
            SectionValue::Generic(pairs) => pairs.is_empty(),
        }
    }
}

fn parse_category(value: &Value) -> Option<Category> {
    let map = value.as_object()?;
    Some(Category {
        name: map.get("name").map(value_to_text).unwrap_or_default(),
        items: map.get("items").map(value_to_list).unwrap_or_default(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// JSON helpers
// ────────────────────────────────────────────────────────────────────────────

/// Null, false, empty strings and empty containers count as blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

/// Flattens a JSON value into display text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !is_blank(v))
            .map(|(k, v)| format!("{k}: {}", value_to_text(v)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn value_to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|v| !is_blank(v))
            .map(value_to_text)
            .collect(),
        v if is_blank(v) => Vec::new(),
        v => vec![value_to_text(v)],
    }
}
