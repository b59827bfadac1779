// SPDX-License-Identifier: MIT

//! Reducers for the form state tree
//!
//! Every reducer is a pure function from `(state, action)` to the next
//! state. When an action changes nothing the input `Arc` is returned
//! unchanged; otherwise a new node is built and every untouched child is
//! shared with the previous tree.

mod control;
mod group;

pub use control::form_control_reducer;
pub use group::form_group_reducer;

use serde_json::Value;

use super::action::Action;
use super::state::ControlState;
use super::utils::{describe_kind, is_local_error_key, ErrorMap};
use super::value::FormValue;
use crate::error::ReducerError;

/// Apply `action` to any node of the tree.
pub fn form_state_reducer(
    state: &ControlState,
    action: &Action,
) -> Result<ControlState, ReducerError> {
    match state {
        ControlState::Control(control) => {
            form_control_reducer(control, action).map(ControlState::Control)
        }
        ControlState::Group(group) => form_group_reducer(group, action).map(ControlState::Group),
    }
}

/// Apply a sequence of actions in order, stopping at the first fatal error.
pub fn reduce_all<'a>(
    state: &ControlState,
    actions: impl IntoIterator<Item = &'a Action>,
) -> Result<ControlState, ReducerError> {
    actions
        .into_iter()
        .try_fold(state.clone(), |current, action| {
            form_state_reducer(&current, action)
        })
}

/// Check a `SET_ERRORS` payload and turn it into an error map.
///
/// The payload must be a JSON object whose keys are all local: `_` belongs to
/// child-mirrored errors and `$` to async errors.
pub(crate) fn parse_errors_payload(
    control_id: &str,
    payload: &Value,
) -> Result<ErrorMap, ReducerError> {
    let Value::Object(errors) = payload else {
        log::warn!(
            "Rejecting SET_ERRORS for '{}': payload is {}",
            control_id,
            describe_kind(payload)
        );
        return Err(ReducerError::InvalidErrorsShape {
            control_id: control_id.to_string(),
            found: describe_kind(payload).to_string(),
        });
    };

    if let Some(key) = errors.keys().find(|key| !is_local_error_key(key)) {
        log::warn!("Rejecting SET_ERRORS for '{}': key '{}'", control_id, key);
        return Err(ReducerError::ReservedKeyPrefix {
            control_id: control_id.to_string(),
            key: key.clone(),
        });
    }

    Ok(errors.clone())
}

/// Reject values holding an opaque date anywhere inside them.
pub(crate) fn ensure_supported_value(
    control_id: &str,
    value: &FormValue,
) -> Result<(), ReducerError> {
    if value.contains_date() {
        log::warn!("Rejecting SET_VALUE for '{}': date value", control_id);
        return Err(ReducerError::UnsupportedValueType {
            control_id: control_id.to_string(),
        });
    }
    Ok(())
}
