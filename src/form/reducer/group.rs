// SPDX-License-Identifier: MIT

//! Group control reducer
//!
//! Reduction runs in two passes. The direct pass handles an action addressed
//! to the group itself; the propagation pass then hands the original action
//! to every child so that anything addressed further down the tree is
//! reached in the same traversal.

use serde_json::Value;
use std::sync::Arc;

use super::{ensure_supported_value, form_state_reducer, parse_errors_payload};
use crate::error::ReducerError;
use crate::form::action::{Action, ActionKind};
use crate::form::state::{
    compute_group_state, AbstractControlState, ControlFlags, ControlState, Controls,
    FormGroupState,
};
use crate::form::utils::{
    async_error_key, deep_equals, describe_kind, filter_errors, is_empty, is_local_error_key,
    local_errors, ErrorMap,
};
use crate::form::value::FormValue;

type GroupResult = Result<Arc<FormGroupState>, ReducerError>;

/// Apply `action` to a group and, recursively, to its descendants.
pub fn form_group_reducer(state: &Arc<FormGroupState>, action: &Action) -> GroupResult {
    let direct = reduce_directly(state, action)?;
    propagate(&direct, action)
}

/// Keep `previous` if `next` carries nothing new.
fn commit(previous: &Arc<FormGroupState>, next: FormGroupState) -> Arc<FormGroupState> {
    if next.is_same_snapshot(previous) {
        Arc::clone(previous)
    } else {
        Arc::new(next)
    }
}

fn recompute(
    state: &Arc<FormGroupState>,
    controls: Controls,
    errors: &ErrorMap,
    own_flags: ControlFlags,
) -> Arc<FormGroupState> {
    commit(
        state,
        compute_group_state(&state.id, controls, &state.value, errors, own_flags),
    )
}

fn controls_changed(previous: &Controls, next: &Controls) -> bool {
    previous.len() != next.len()
        || previous
            .values()
            .zip(next.values())
            .any(|(old, new)| !old.ptr_eq(new))
}

fn propagate(state: &Arc<FormGroupState>, action: &Action) -> GroupResult {
    let controls = state
        .controls
        .iter()
        .map(|(key, child)| Ok::<_, ReducerError>((key.clone(), form_state_reducer(child, action)?)))
        .collect::<Result<Controls, ReducerError>>()?;

    if !controls_changed(&state.controls, &controls) {
        return Ok(Arc::clone(state));
    }

    Ok(recompute(state, controls, &state.errors, state.flags))
}

fn reduce_directly(state: &Arc<FormGroupState>, action: &Action) -> GroupResult {
    if action.control_id != state.id {
        return Ok(Arc::clone(state));
    }

    let next = match &action.kind {
        ActionKind::SetValue { value } => set_value(state, value)?,
        ActionKind::SetErrors { errors } => set_errors(state, errors)?,
        ActionKind::SetAsyncError { name, value } => set_async_error(state, name, value),
        ActionKind::ClearAsyncError { name } => clear_async_error(state, name),
        ActionKind::AddControl { name, value } => add_control(state, name, value)?,
        ActionKind::RemoveControl { name } => remove_control(state, name)?,
        ActionKind::MarkAsDirty => {
            broadcast_unless(state, action, state.is_dirty(), |f| f.is_dirty = true)?
        }
        ActionKind::MarkAsPristine => {
            broadcast_unless(state, action, state.is_pristine(), |f| f.is_dirty = false)?
        }
        ActionKind::Enable => {
            broadcast_unless(state, action, state.is_enabled(), |f| f.is_enabled = true)?
        }
        ActionKind::Disable => disable(state, action)?,
        ActionKind::MarkAsTouched => {
            broadcast_unless(state, action, state.is_touched(), |f| f.is_touched = true)?
        }
        ActionKind::MarkAsUntouched => {
            broadcast_unless(state, action, state.is_untouched(), |f| f.is_touched = false)?
        }
        ActionKind::MarkAsSubmitted => {
            broadcast_unless(state, action, state.is_submitted(), |f| f.is_submitted = true)?
        }
        ActionKind::MarkAsUnsubmitted => broadcast_unless(
            state,
            action,
            state.is_unsubmitted(),
            |f| f.is_submitted = false,
        )?,
        ActionKind::Reset => {
            let is_reset = state.is_pristine() && state.is_untouched() && state.is_unsubmitted();
            broadcast_unless(state, action, is_reset, |f| {
                f.is_dirty = false;
                f.is_touched = false;
                f.is_submitted = false;
            })?
        }
        // Groups are never focused themselves.
        ActionKind::Focus | ActionKind::Unfocus => Arc::clone(state),
    };

    if Arc::ptr_eq(state, &next) {
        log::trace!("{} left group '{}' unchanged", action.kind, state.id);
    } else {
        log::debug!("{} applied to group '{}'", action.kind, state.id);
    }
    Ok(next)
}

fn set_value(state: &Arc<FormGroupState>, value: &FormValue) -> GroupResult {
    ensure_supported_value(&state.id, value)?;
    if *value == state.value {
        return Ok(Arc::clone(state));
    }

    let FormValue::Object(fields) = value else {
        log::warn!("Rejecting SET_VALUE for group '{}': not an object", state.id);
        return Err(ReducerError::InvalidGroupValue {
            control_id: state.id.clone(),
            found: describe_kind(&Value::from(value.clone())).to_string(),
        });
    };

    let controls = fields
        .iter()
        .map(|(key, child_value)| {
            let child = match state.controls.get(key) {
                Some(existing) if existing.is_group() == child_value.is_object() => {
                    let action = Action::set_value(existing.id(), child_value.clone());
                    form_state_reducer(existing, &action)?
                }
                _ => ControlState::from_value(state.child_id(key), child_value.clone()),
            };
            Ok::<_, ReducerError>((key.clone(), child))
        })
        .collect::<Result<Controls, ReducerError>>()?;

    Ok(recompute(state, controls, &state.errors, state.flags))
}

fn set_errors(state: &Arc<FormGroupState>, payload: &Value) -> GroupResult {
    let errors = parse_errors_payload(&state.id, payload)?;
    if state.is_disabled() || deep_equals(&errors, &local_errors(&state.errors)) {
        return Ok(Arc::clone(state));
    }

    let merged = filter_errors(&state.errors, |key| !is_local_error_key(key))
        .into_iter()
        .chain(errors)
        .collect::<ErrorMap>();

    Ok(recompute(state, state.controls.clone(), &merged, state.flags))
}

fn set_async_error(state: &Arc<FormGroupState>, name: &str, value: &Value) -> Arc<FormGroupState> {
    let key = async_error_key(name);
    if state.is_disabled() || state.errors.get(&key) == Some(value) {
        return Arc::clone(state);
    }

    let mut errors = state.errors.clone();
    errors.insert(key, value.clone());
    recompute(state, state.controls.clone(), &errors, state.flags)
}

fn clear_async_error(state: &Arc<FormGroupState>, name: &str) -> Arc<FormGroupState> {
    let key = async_error_key(name);
    if !state.errors.contains_key(&key) {
        return Arc::clone(state);
    }

    let mut errors = state.errors.clone();
    errors.remove(&key);
    recompute(state, state.controls.clone(), &errors, state.flags)
}

fn add_control(state: &Arc<FormGroupState>, name: &str, value: &FormValue) -> GroupResult {
    if state.controls.contains_key(name) {
        return Err(ReducerError::ControlAlreadyExists {
            group_id: state.id.clone(),
            name: name.to_string(),
        });
    }
    ensure_supported_value(&state.child_id(name), value)?;

    let mut controls = state.controls.clone();
    controls.insert(
        name.to_string(),
        ControlState::from_value(state.child_id(name), value.clone()),
    );
    Ok(recompute(state, controls, &state.errors, state.flags))
}

fn remove_control(state: &Arc<FormGroupState>, name: &str) -> GroupResult {
    if !state.controls.contains_key(name) {
        return Err(ReducerError::ControlNotFound {
            group_id: state.id.clone(),
            name: name.to_string(),
        });
    }

    let controls = state
        .controls
        .iter()
        .filter(|(key, _)| key.as_str() != name)
        .map(|(key, child)| (key.clone(), child.clone()))
        .collect::<Controls>();
    Ok(recompute(state, controls, &state.errors, state.flags))
}

/// Disabling a group disables every child and drops the group's whole error map.
fn disable(state: &Arc<FormGroupState>, action: &Action) -> GroupResult {
    if state.is_disabled() && is_empty(&state.errors) {
        return Ok(Arc::clone(state));
    }

    let controls = broadcast(state, action)?;
    let own_flags = ControlFlags {
        is_enabled: false,
        ..state.flags
    };
    Ok(recompute(state, controls, &ErrorMap::new(), own_flags))
}

/// Re-address `action` to every child unless the group already satisfies it.
fn broadcast_unless(
    state: &Arc<FormGroupState>,
    action: &Action,
    satisfied: bool,
    update: impl FnOnce(&mut ControlFlags),
) -> GroupResult {
    if satisfied {
        return Ok(Arc::clone(state));
    }

    let controls = broadcast(state, action)?;
    let mut own_flags = state.flags;
    update(&mut own_flags);
    Ok(recompute(state, controls, &state.errors, own_flags))
}

fn broadcast(state: &FormGroupState, action: &Action) -> Result<Controls, ReducerError> {
    state
        .controls
        .iter()
        .map(|(key, child)| {
            let child_action = action.readdressed(child.id());
            Ok::<_, ReducerError>((key.clone(), form_state_reducer(child, &child_action)?))
        })
        .collect()
}
