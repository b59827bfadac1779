// SPDX-License-Identifier: MIT

//! Group state

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::compute::compute_group_state;
use super::{AbstractControlState, ControlFlags, ControlState};
use crate::form::utils::ErrorMap;
use crate::form::value::{FormObject, FormValue};

/// Child controls of a group, keyed by the field name they hold
pub type Controls = BTreeMap<String, ControlState>;

/// State of a composite control whose value is derived from named children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormGroupState {
    pub(crate) id: String,
    pub(crate) value: FormValue,
    #[serde(default)]
    pub(crate) errors: ErrorMap,
    #[serde(flatten)]
    pub(crate) flags: ControlFlags,
    pub(crate) controls: Controls,
}

/// Create a group for `value`, building one child per key.
///
/// Object-valued keys become nested groups with id `{id}.{key}`, all other
/// keys become leaf controls.
pub fn create_form_group_state(id: impl Into<String>, value: FormObject) -> FormGroupState {
    let id = id.into();
    let controls: Controls = value
        .into_iter()
        .map(|(key, child_value)| {
            let child_id = format!("{id}.{key}");
            (key, ControlState::from_value(child_id, child_value))
        })
        .collect();

    compute_group_state(
        &id,
        controls,
        &FormValue::from(FormObject::new()),
        &ErrorMap::new(),
        ControlFlags::default(),
    )
}

impl FormGroupState {
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Child control for field `name`
    pub fn control(&self, name: &str) -> Option<&ControlState> {
        self.controls.get(name)
    }

    /// Id a child for field `name` gets
    pub fn child_id(&self, name: &str) -> String {
        format!("{}.{}", self.id, name)
    }

    /// Field-by-field identity check against another snapshot.
    ///
    /// Children are compared by pointer, everything else by value.
    pub fn is_same_snapshot(&self, other: &FormGroupState) -> bool {
        self.id == other.id
            && self.flags == other.flags
            && self.controls.len() == other.controls.len()
            && self
                .controls
                .iter()
                .zip(other.controls.iter())
                .all(|((ka, a), (kb, b))| ka == kb && a.ptr_eq(b))
            && (self.value.ptr_eq(&other.value) || self.value == other.value)
            && self.errors == other.errors
    }
}

impl AbstractControlState for FormGroupState {
    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self) -> &FormValue {
        &self.value
    }

    fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    fn flags(&self) -> ControlFlags {
        self.flags
    }
}
