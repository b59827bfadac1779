// SPDX-License-Identifier: MIT

//! Dynamic form values

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Key-ordered object value; the shape a group's value takes.
pub type FormObject = BTreeMap<String, FormValue>;

/// A value held by a control.
///
/// Mirrors the JSON data model plus an opaque [`FormValue::Date`] variant.
/// Dates can be built programmatically but every reducer rejects them:
/// callers are expected to store a serialized string instead.
///
/// Objects sit behind an `Arc`, so a group can hand its unchanged value to
/// the next snapshot, and to its parent's value, without copying the subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FormValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<FormValue>),
    Object(Arc<FormObject>),
    Date(DateTime<Utc>),
}

impl FormValue {
    /// Object values map onto groups, everything else onto leaf controls.
    pub fn is_object(&self) -> bool {
        matches!(self, FormValue::Object(_))
    }

    pub fn as_object(&self) -> Option<&FormObject> {
        match self {
            FormValue::Object(map) => Some(&**map),
            _ => None,
        }
    }

    /// True if both values are objects sharing the same allocation.
    pub fn ptr_eq(&self, other: &FormValue) -> bool {
        match (self, other) {
            (FormValue::Object(a), FormValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// True if a date appears anywhere inside this value.
    pub fn contains_date(&self) -> bool {
        match self {
            FormValue::Date(_) => true,
            FormValue::Array(items) => items.iter().any(FormValue::contains_date),
            FormValue::Object(map) => map.values().any(FormValue::contains_date),
            _ => false,
        }
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FormValue::Null,
            Value::Bool(b) => FormValue::Bool(b),
            Value::Number(n) => FormValue::Number(n),
            Value::String(s) => FormValue::String(s),
            Value::Array(items) => FormValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => FormValue::from(
                map.into_iter()
                    .map(|(k, v)| (k, v.into()))
                    .collect::<FormObject>(),
            ),
        }
    }
}

impl From<FormValue> for Value {
    fn from(value: FormValue) -> Self {
        match value {
            FormValue::Null => Value::Null,
            FormValue::Bool(b) => Value::Bool(b),
            FormValue::Number(n) => Value::Number(n),
            FormValue::String(s) => Value::String(s),
            FormValue::Array(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            FormValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.clone().into()))
                    .collect(),
            ),
            FormValue::Date(date) => Value::String(date.to_rfc3339()),
        }
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::String(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::String(s)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Bool(b)
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Number(n.into())
    }
}

impl From<DateTime<Utc>> for FormValue {
    fn from(date: DateTime<Utc>) -> Self {
        FormValue::Date(date)
    }
}

impl From<FormObject> for FormValue {
    fn from(map: FormObject) -> Self {
        FormValue::Object(Arc::new(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object() {
        let value = FormValue::from(json!({"name": "Ada", "tags": ["a", "b"], "age": 36}));
        let map = value.as_object().unwrap();
        assert_eq!(map["name"], FormValue::from("Ada"));
        assert_eq!(map["age"], FormValue::from(36i64));
        assert!(matches!(map["tags"], FormValue::Array(_)));
    }

    #[test]
    fn test_deserialize_matches_from_json() {
        let raw = json!({"a": {"b": [1, null, true]}, "c": "x"});
        let parsed: FormValue = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed, FormValue::from(raw));
    }

    #[test]
    fn test_strings_never_deserialize_as_dates() {
        let parsed: FormValue = serde_json::from_str("\"2024-01-01T00:00:00Z\"").unwrap();
        assert_eq!(parsed, FormValue::from("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_date_serializes_as_string() {
        let date = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let json: Value = FormValue::from(date).into();
        assert_eq!(json, json!("2024-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_contains_date_nested() {
        let date = Utc::now();
        let value = FormValue::Array(vec![FormValue::Null, FormValue::Date(date)]);
        assert!(value.contains_date());
        assert!(!FormValue::from(json!([1, 2])).contains_date());
    }

    #[test]
    fn test_clones_share_objects() {
        let value = FormValue::from(json!({"address": {"city": "Oslo"}}));
        let copy = value.clone();
        assert!(copy.ptr_eq(&value));
        assert!(!FormValue::from(json!({})).ptr_eq(&FormValue::from(json!({}))));
        assert!(!FormValue::from(1i64).ptr_eq(&FormValue::from(1i64)));
    }
}
