// SPDX-License-Identifier: MIT

//! Actions understood by the form reducers
//!
//! On the wire an action looks like
//! `{"type": "SET_VALUE", "controlId": "form.name", "payload": {"value": "Ada"}}`;
//! actions without data omit `payload`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::FormValue;

/// An action addressed to a single control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Id of the control the action targets
    pub control_id: String,
    #[serde(flatten)]
    pub kind: ActionKind,
}

/// The closed set of action types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum ActionKind {
    /// Replace the value (groups rebuild their children from it)
    SetValue { value: FormValue },
    /// Replace the local error partition. Kept as raw JSON so the shape can be checked.
    SetErrors {
        #[serde(default)]
        errors: Value,
    },
    /// Store an externally resolved error under `$name`
    SetAsyncError { name: String, value: Value },
    /// Drop the async error `$name`
    ClearAsyncError { name: String },
    /// Add child `name` to a group
    AddControl { name: String, value: FormValue },
    /// Remove child `name` from a group
    RemoveControl { name: String },
    MarkAsDirty,
    MarkAsPristine,
    Enable,
    Disable,
    MarkAsTouched,
    MarkAsUntouched,
    MarkAsSubmitted,
    MarkAsUnsubmitted,
    Focus,
    Unfocus,
    /// Pristine, untouched and unsubmitted in one step
    Reset,
}

impl ActionKind {
    /// The wire name of this action type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetValue { .. } => "SET_VALUE",
            Self::SetErrors { .. } => "SET_ERRORS",
            Self::SetAsyncError { .. } => "SET_ASYNC_ERROR",
            Self::ClearAsyncError { .. } => "CLEAR_ASYNC_ERROR",
            Self::AddControl { .. } => "ADD_CONTROL",
            Self::RemoveControl { .. } => "REMOVE_CONTROL",
            Self::MarkAsDirty => "MARK_AS_DIRTY",
            Self::MarkAsPristine => "MARK_AS_PRISTINE",
            Self::Enable => "ENABLE",
            Self::Disable => "DISABLE",
            Self::MarkAsTouched => "MARK_AS_TOUCHED",
            Self::MarkAsUntouched => "MARK_AS_UNTOUCHED",
            Self::MarkAsSubmitted => "MARK_AS_SUBMITTED",
            Self::MarkAsUnsubmitted => "MARK_AS_UNSUBMITTED",
            Self::Focus => "FOCUS",
            Self::Unfocus => "UNFOCUS",
            Self::Reset => "RESET",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub fn new(control_id: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            control_id: control_id.into(),
            kind,
        }
    }

    /// The same action addressed to another control
    pub fn readdressed(&self, control_id: &str) -> Self {
        Self {
            control_id: control_id.to_string(),
            kind: self.kind.clone(),
        }
    }

    pub fn set_value(control_id: impl Into<String>, value: impl Into<FormValue>) -> Self {
        Self::new(
            control_id,
            ActionKind::SetValue {
                value: value.into(),
            },
        )
    }

    pub fn set_errors(control_id: impl Into<String>, errors: Value) -> Self {
        Self::new(control_id, ActionKind::SetErrors { errors })
    }

    pub fn set_async_error(
        control_id: impl Into<String>,
        name: impl Into<String>,
        value: Value,
    ) -> Self {
        Self::new(
            control_id,
            ActionKind::SetAsyncError {
                name: name.into(),
                value,
            },
        )
    }

    pub fn clear_async_error(control_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::ClearAsyncError { name: name.into() })
    }

    pub fn add_control(
        control_id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<FormValue>,
    ) -> Self {
        Self::new(
            control_id,
            ActionKind::AddControl {
                name: name.into(),
                value: value.into(),
            },
        )
    }

    pub fn remove_control(control_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::RemoveControl { name: name.into() })
    }

    pub fn mark_as_dirty(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::MarkAsDirty)
    }

    pub fn mark_as_pristine(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::MarkAsPristine)
    }

    pub fn enable(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::Enable)
    }

    pub fn disable(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::Disable)
    }

    pub fn mark_as_touched(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::MarkAsTouched)
    }

    pub fn mark_as_untouched(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::MarkAsUntouched)
    }

    pub fn mark_as_submitted(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::MarkAsSubmitted)
    }

    pub fn mark_as_unsubmitted(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::MarkAsUnsubmitted)
    }

    pub fn focus(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::Focus)
    }

    pub fn unfocus(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::Unfocus)
    }

    pub fn reset(control_id: impl Into<String>) -> Self {
        Self::new(control_id, ActionKind::Reset)
    }
}
