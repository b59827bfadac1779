// SPDX-License-Identifier: MIT

//! Typed error handling for formstate-rs
//!
//! Reducers only ever fail with a [`ReducerError`]. Everything that touches
//! the outside world (loading scripts, parsing values) goes through
//! [`FormError`].

use thiserror::Error;

/// Top-level error type for formstate-rs
#[derive(Debug, Error)]
pub enum FormError {
    /// Fatal rejection raised while reducing an action
    #[error("Reducer error: {0}")]
    Reducer(#[from] ReducerError),

    /// Malformed replay script
    #[error("Script error: {0}")]
    Script(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Fatal errors raised by the control reducers.
///
/// Every variant names the control the offending action was addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReducerError {
    /// `SET_ERRORS` payload was missing, an array, or not a key-value mapping
    #[error("Control '{control_id}': errors must be an object, found {found}")]
    InvalidErrorsShape { control_id: String, found: String },

    /// `SET_ERRORS` payload used a key from the child (`_`) or async (`$`) namespace
    #[error("Control '{control_id}': error key '{key}' uses a reserved prefix")]
    ReservedKeyPrefix { control_id: String, key: String },

    /// `SET_VALUE` payload contained an opaque date value
    #[error("Control '{control_id}': date values are not supported, serialize them to a string")]
    UnsupportedValueType { control_id: String },

    /// `SET_VALUE` addressed to a group carried something other than an object
    #[error("Group '{control_id}': value must be an object, found {found}")]
    InvalidGroupValue { control_id: String, found: String },

    /// `ADD_CONTROL` named a key the group already owns
    #[error("Group '{group_id}' already has a child control '{name}'")]
    ControlAlreadyExists { group_id: String, name: String },

    /// `REMOVE_CONTROL` named a key the group does not own
    #[error("Group '{group_id}' has no child control '{name}'")]
    ControlNotFound { group_id: String, name: String },
}

impl FormError {
    /// Create a script error
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script(message.into())
    }
}

pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reducer_error_display() {
        let err = ReducerError::ReservedKeyPrefix {
            control_id: "form.name".to_string(),
            key: "_x".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Control 'form.name': error key '_x' uses a reserved prefix"
        );
    }

    #[test]
    fn test_reducer_error_converts_into_form_error() {
        let err: FormError = ReducerError::UnsupportedValueType {
            control_id: "form".to_string(),
        }
        .into();
        assert!(matches!(err, FormError::Reducer(_)));
        assert!(err.to_string().starts_with("Reducer error:"));
    }

    #[test]
    fn test_script_error_display() {
        let err = FormError::script("form id must not be empty");
        assert_eq!(err.to_string(), "Script error: form id must not be empty");
    }
}
