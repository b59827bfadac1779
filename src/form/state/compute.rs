// SPDX-License-Identifier: MIT

//! Group state composition
//!
//! A group never stores anything its children already know. Its value, the
//! child-mirrored part of its error map, and its flags are all rebuilt from
//! `controls` whenever a child changes.

use serde_json::Value;

use super::group::{Controls, FormGroupState};
use super::{AbstractControlState, ControlFlags};
use crate::form::utils::{child_error_key, filter_errors, is_child_error_key, is_empty, ErrorMap};
use crate::form::value::{FormObject, FormValue};

/// Derive a group snapshot from its children.
///
/// `value` and `errors` are the group's previous value and error map: the
/// previous value is reused when every child still holds the same value,
/// and every non-child (local and async) error entry is carried over.
/// `own_flags` only apply to a group without children; otherwise each flag
/// is the OR of the children's flags. A disabled group holds no errors.
pub fn compute_group_state(
    id: &str,
    controls: Controls,
    value: &FormValue,
    errors: &ErrorMap,
    own_flags: ControlFlags,
) -> FormGroupState {
    let value = derive_value(&controls, value);
    let flags = derive_flags(&controls, own_flags);
    let errors = if flags.is_enabled {
        derive_errors(&controls, errors)
    } else {
        ErrorMap::new()
    };

    FormGroupState {
        id: id.to_string(),
        value,
        errors,
        flags,
        controls,
    }
}

fn derive_value(controls: &Controls, previous: &FormValue) -> FormValue {
    let unchanged = previous.as_object().is_some_and(|prev| {
        prev.len() == controls.len()
            && controls
                .iter()
                .all(|(key, child)| prev.get(key) == Some(child.value()))
    });
    if unchanged {
        return previous.clone();
    }

    FormValue::from(
        controls
            .iter()
            .map(|(key, child)| (key.clone(), child.value().clone()))
            .collect::<FormObject>(),
    )
}

fn derive_errors(controls: &Controls, previous: &ErrorMap) -> ErrorMap {
    let own = filter_errors(previous, |key| !is_child_error_key(key));

    controls
        .iter()
        .filter(|(_, child)| !is_empty(child.errors()))
        .fold(own, |mut errors, (key, child)| {
            errors.insert(child_error_key(key), Value::Object(child.errors().clone()));
            errors
        })
}

fn derive_flags(controls: &Controls, own_flags: ControlFlags) -> ControlFlags {
    if controls.is_empty() {
        return own_flags;
    }

    ControlFlags {
        is_enabled: any_child(controls, |f| f.is_enabled),
        is_dirty: any_child(controls, |f| f.is_dirty),
        is_touched: any_child(controls, |f| f.is_touched),
        is_submitted: any_child(controls, |f| f.is_submitted),
    }
}

fn any_child(controls: &Controls, flag: impl Fn(&ControlFlags) -> bool) -> bool {
    controls.values().any(|child| flag(&child.flags()))
}
