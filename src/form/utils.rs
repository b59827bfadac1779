// SPDX-License-Identifier: MIT

//! Value and error-map utilities
//!
//! Error maps are partitioned by key prefix:
//! - unprefixed keys are errors local to the control
//! - `_name` mirrors the errors of the child control `name`
//! - `$name` holds an externally supplied (async) error

use serde_json::{Map, Value};

/// Mapping from error key to error payload
pub type ErrorMap = Map<String, Value>;

/// Prefix of errors mirrored from a child control
pub const CHILD_ERROR_PREFIX: char = '_';

/// Prefix of externally supplied async errors
pub const ASYNC_ERROR_PREFIX: char = '$';

/// True iff the map has no keys.
pub fn is_empty(map: &ErrorMap) -> bool {
    map.is_empty()
}

/// Structural equality.
///
/// Maps compare by content, so two distinct empty maps are equal, and
/// nested arrays/objects are compared element-wise.
pub fn deep_equals<T: PartialEq + ?Sized>(a: &T, b: &T) -> bool {
    a == b
}

pub fn is_child_error_key(key: &str) -> bool {
    key.starts_with(CHILD_ERROR_PREFIX)
}

pub fn is_async_error_key(key: &str) -> bool {
    key.starts_with(ASYNC_ERROR_PREFIX)
}

pub fn is_local_error_key(key: &str) -> bool {
    !is_child_error_key(key) && !is_async_error_key(key)
}

/// Key under which a group mirrors the errors of child `name`
pub fn child_error_key(name: &str) -> String {
    format!("{CHILD_ERROR_PREFIX}{name}")
}

/// Key under which an async error named `name` is stored
pub fn async_error_key(name: &str) -> String {
    format!("{ASYNC_ERROR_PREFIX}{name}")
}

/// Copy of the entries whose keys satisfy `keep`
pub fn filter_errors(errors: &ErrorMap, keep: impl Fn(&str) -> bool) -> ErrorMap {
    errors
        .iter()
        .filter(|(key, _)| keep(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Entries local to the control itself
pub fn local_errors(errors: &ErrorMap) -> ErrorMap {
    filter_errors(errors, is_local_error_key)
}

/// Short name of a JSON value's type, used in error messages
pub fn describe_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
