// SPDX-License-Identifier: MIT

//! Leaf control reducer

use serde_json::Value;
use std::sync::Arc;

use super::{ensure_supported_value, parse_errors_payload};
use crate::error::ReducerError;
use crate::form::action::{Action, ActionKind};
use crate::form::state::{AbstractControlState, ControlFlags, FormControlState};
use crate::form::utils::{
    async_error_key, deep_equals, filter_errors, is_async_error_key, is_empty, local_errors,
    ErrorMap,
};
use crate::form::value::FormValue;

/// Apply `action` to a leaf control.
///
/// Actions addressed to another control, and actions that would not change
/// anything, return `state` itself.
pub fn form_control_reducer(
    state: &Arc<FormControlState>,
    action: &Action,
) -> Result<Arc<FormControlState>, ReducerError> {
    if action.control_id != state.id {
        return Ok(Arc::clone(state));
    }

    let next = match &action.kind {
        ActionKind::SetValue { value } => set_value(state, value)?,
        ActionKind::SetErrors { errors } => set_errors(state, errors)?,
        ActionKind::SetAsyncError { name, value } => set_async_error(state, name, value),
        ActionKind::ClearAsyncError { name } => clear_async_error(state, name),
        ActionKind::MarkAsDirty => update_flags(state, |f| f.is_dirty = true),
        ActionKind::MarkAsPristine => update_flags(state, |f| f.is_dirty = false),
        ActionKind::Enable => update_flags(state, |f| f.is_enabled = true),
        ActionKind::Disable => disable(state),
        ActionKind::MarkAsTouched => update_flags(state, |f| f.is_touched = true),
        ActionKind::MarkAsUntouched => update_flags(state, |f| f.is_touched = false),
        ActionKind::MarkAsSubmitted => update_flags(state, |f| f.is_submitted = true),
        ActionKind::MarkAsUnsubmitted => update_flags(state, |f| f.is_submitted = false),
        ActionKind::Focus => set_focus(state, true),
        ActionKind::Unfocus => set_focus(state, false),
        ActionKind::Reset => update_flags(state, |f| {
            f.is_dirty = false;
            f.is_touched = false;
            f.is_submitted = false;
        }),
        // Structural actions only mean something to groups.
        ActionKind::AddControl { .. } | ActionKind::RemoveControl { .. } => None,
    };

    match next {
        Some(next) => {
            log::debug!("{} applied to control '{}'", action.kind, state.id);
            Ok(Arc::new(next))
        }
        None => {
            log::trace!("{} left control '{}' unchanged", action.kind, state.id);
            Ok(Arc::clone(state))
        }
    }
}

fn set_value(
    state: &FormControlState,
    value: &FormValue,
) -> Result<Option<FormControlState>, ReducerError> {
    ensure_supported_value(&state.id, value)?;
    if *value == state.value {
        return Ok(None);
    }

    Ok(Some(FormControlState {
        value: value.clone(),
        ..state.clone()
    }))
}

fn set_errors(
    state: &FormControlState,
    payload: &Value,
) -> Result<Option<FormControlState>, ReducerError> {
    let errors = parse_errors_payload(&state.id, payload)?;
    if state.is_disabled() || deep_equals(&errors, &local_errors(&state.errors)) {
        return Ok(None);
    }

    let merged = filter_errors(&state.errors, is_async_error_key)
        .into_iter()
        .chain(errors)
        .collect::<ErrorMap>();

    Ok(Some(FormControlState {
        errors: merged,
        ..state.clone()
    }))
}

fn set_async_error(state: &FormControlState, name: &str, value: &Value) -> Option<FormControlState> {
    let key = async_error_key(name);
    if state.is_disabled() || state.errors.get(&key) == Some(value) {
        return None;
    }

    let mut errors = state.errors.clone();
    errors.insert(key, value.clone());
    Some(FormControlState {
        errors,
        ..state.clone()
    })
}

fn clear_async_error(state: &FormControlState, name: &str) -> Option<FormControlState> {
    let key = async_error_key(name);
    if !state.errors.contains_key(&key) {
        return None;
    }

    let mut errors = state.errors.clone();
    errors.remove(&key);
    Some(FormControlState {
        errors,
        ..state.clone()
    })
}

fn disable(state: &FormControlState) -> Option<FormControlState> {
    if state.is_disabled() && is_empty(&state.errors) {
        return None;
    }

    Some(FormControlState {
        errors: ErrorMap::new(),
        flags: ControlFlags {
            is_enabled: false,
            ..state.flags
        },
        ..state.clone()
    })
}

fn set_focus(state: &FormControlState, is_focused: bool) -> Option<FormControlState> {
    if state.is_focused == is_focused {
        return None;
    }

    Some(FormControlState {
        is_focused,
        ..state.clone()
    })
}

/// New state with `update` applied to the flags, or `None` if they would not change.
fn update_flags(
    state: &FormControlState,
    update: impl FnOnce(&mut ControlFlags),
) -> Option<FormControlState> {
    let mut flags = state.flags;
    update(&mut flags);
    if flags == state.flags {
        return None;
    }

    Some(FormControlState {
        flags,
        ..state.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::state::create_form_control_state;
    use chrono::Utc;
    use serde_json::json;

    const ID: &str = "form.name";

    fn control(value: serde_json::Value) -> Arc<FormControlState> {
        Arc::new(create_form_control_state(ID, value.into()))
    }

    fn reduce(state: &Arc<FormControlState>, action: Action) -> Arc<FormControlState> {
        form_control_reducer(state, &action).unwrap()
    }

    #[test]
    fn test_ignores_other_ids() {
        let state = control(json!("a"));
        let next = reduce(&state, Action::set_value("form.other", "b"));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn test_set_value() {
        let state = control(json!("a"));
        let next = reduce(&state, Action::set_value(ID, "b"));
        assert_eq!(next.value(), &FormValue::from("b"));
        assert_eq!(state.value(), &FormValue::from("a"));
    }

    #[test]
    fn test_set_value_equal_is_noop() {
        let state = control(json!([1, 2]));
        let next = reduce(&state, Action::set_value(ID, FormValue::from(json!([1, 2]))));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn test_set_value_rejects_dates() {
        let state = control(json!("a"));
        let err = form_control_reducer(&state, &Action::set_value(ID, Utc::now())).unwrap_err();
        assert_eq!(
            err,
            ReducerError::UnsupportedValueType {
                control_id: ID.to_string()
            }
        );
    }

    #[test]
    fn test_set_errors() {
        let state = control(json!(""));
        let next = reduce(&state, Action::set_errors(ID, json!({"required": true})));
        assert!(next.is_invalid());
        assert_eq!(next.errors().get("required"), Some(&json!(true)));
    }

    #[test]
    fn test_set_errors_deep_equal_is_noop() {
        let state = reduce(
            &control(json!("")),
            Action::set_errors(ID, json!({"range": {"min": 1, "max": [2, 3]}})),
        );
        let next = reduce(
            &state,
            Action::set_errors(ID, json!({"range": {"min": 1, "max": [2, 3]}})),
        );
        assert!(Arc::ptr_eq(&state, &next));

        let clean = control(json!(""));
        let next = reduce(&clean, Action::set_errors(ID, json!({})));
        assert!(Arc::ptr_eq(&clean, &next));
    }

    #[test]
    fn test_set_errors_rejects_invalid_payloads() {
        let state = control(json!(""));
        let err = form_control_reducer(&state, &Action::set_errors(ID, json!(["not", "an", "object"])))
            .unwrap_err();
        assert!(matches!(err, ReducerError::InvalidErrorsShape { .. }));

        let err =
            form_control_reducer(&state, &Action::set_errors(ID, json!({"_x": 1}))).unwrap_err();
        assert!(matches!(err, ReducerError::ReservedKeyPrefix { .. }));

        let err =
            form_control_reducer(&state, &Action::set_errors(ID, json!({"$x": 1}))).unwrap_err();
        assert!(matches!(err, ReducerError::ReservedKeyPrefix { .. }));
    }

    #[test]
    fn test_set_errors_noop_when_disabled() {
        let state = reduce(&control(json!("")), Action::disable(ID));
        let next = reduce(&state, Action::set_errors(ID, json!({"required": true})));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn test_set_errors_keeps_async_errors() {
        let state = reduce(
            &control(json!("")),
            Action::set_async_error(ID, "taken", json!(true)),
        );
        let next = reduce(&state, Action::set_errors(ID, json!({"required": true})));
        assert_eq!(
            serde_json::to_value(next.errors()).unwrap(),
            json!({"$taken": true, "required": true})
        );

        let cleared = reduce(&next, Action::set_errors(ID, json!({})));
        assert_eq!(
            serde_json::to_value(cleared.errors()).unwrap(),
            json!({"$taken": true})
        );
    }

    #[test]
    fn test_async_error_lifecycle() {
        let state = control(json!("ada"));
        let with_error = reduce(&state, Action::set_async_error(ID, "taken", json!(true)));
        assert!(with_error.is_invalid());

        let again = reduce(&with_error, Action::set_async_error(ID, "taken", json!(true)));
        assert!(Arc::ptr_eq(&with_error, &again));

        let cleared = reduce(&with_error, Action::clear_async_error(ID, "taken"));
        assert!(cleared.is_valid());

        let again = reduce(&cleared, Action::clear_async_error(ID, "taken"));
        assert!(Arc::ptr_eq(&cleared, &again));
    }

    #[test]
    fn test_dirty_pristine() {
        let state = control(json!(1));
        let dirty = reduce(&state, Action::mark_as_dirty(ID));
        assert!(dirty.is_dirty());
        assert!(Arc::ptr_eq(&dirty, &reduce(&dirty, Action::mark_as_dirty(ID))));

        let pristine = reduce(&dirty, Action::mark_as_pristine(ID));
        assert!(pristine.is_pristine());
        assert!(Arc::ptr_eq(&state, &reduce(&state, Action::mark_as_pristine(ID))));
    }

    #[test]
    fn test_disable_clears_errors_keeps_value() {
        let state = reduce(
            &reduce(&control(json!("x")), Action::set_errors(ID, json!({"bad": 1}))),
            Action::set_async_error(ID, "remote", json!("down")),
        );
        let disabled = reduce(&state, Action::disable(ID));
        assert!(disabled.is_disabled());
        assert!(disabled.is_valid());
        assert_eq!(disabled.value(), &FormValue::from("x"));

        let enabled = reduce(&disabled, Action::enable(ID));
        assert!(enabled.is_enabled());
        assert!(enabled.is_valid());
        assert!(Arc::ptr_eq(&enabled, &reduce(&enabled, Action::enable(ID))));
    }

    #[test]
    fn test_disable_clears_errors_of_disabled_control() {
        let mut stale = create_form_control_state(ID, FormValue::from("x"));
        stale.flags.is_enabled = false;
        stale.errors.insert("bad".to_string(), json!(1));
        let state = Arc::new(stale);

        let disabled = reduce(&state, Action::disable(ID));
        assert!(disabled.is_disabled());
        assert!(disabled.is_valid());
        assert!(Arc::ptr_eq(&disabled, &reduce(&disabled, Action::disable(ID))));
    }

    #[test]
    fn test_touched_and_submitted() {
        let state = control(json!(1));
        let touched = reduce(&state, Action::mark_as_touched(ID));
        assert!(touched.is_touched());
        let twice = reduce(&touched, Action::mark_as_touched(ID));
        assert!(Arc::ptr_eq(&touched, &twice));
        assert!(reduce(&touched, Action::mark_as_untouched(ID)).is_untouched());

        let submitted = reduce(&state, Action::mark_as_submitted(ID));
        assert!(submitted.is_submitted());
        assert!(reduce(&submitted, Action::mark_as_unsubmitted(ID)).is_unsubmitted());
    }

    #[test]
    fn test_focus() {
        let state = control(json!(1));
        let focused = reduce(&state, Action::focus(ID));
        assert!(focused.is_focused());
        assert!(Arc::ptr_eq(&focused, &reduce(&focused, Action::focus(ID))));
        assert!(reduce(&focused, Action::unfocus(ID)).is_unfocused());
    }

    #[test]
    fn test_reset() {
        let state = control(json!(1));
        assert!(Arc::ptr_eq(&state, &reduce(&state, Action::reset(ID))));

        let used = reduce(
            &reduce(&reduce(&state, Action::mark_as_dirty(ID)), Action::mark_as_touched(ID)),
            Action::mark_as_submitted(ID),
        );
        let reset = reduce(&used, Action::reset(ID));
        assert!(reset.is_pristine());
        assert!(reset.is_untouched());
        assert!(reset.is_unsubmitted());
    }

    #[test]
    fn test_structural_actions_are_ignored() {
        let state = control(json!(1));
        let next = reduce(&state, Action::add_control(ID, "x", 1i64));
        assert!(Arc::ptr_eq(&state, &next));
    }
}
