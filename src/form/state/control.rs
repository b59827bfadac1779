// SPDX-License-Identifier: MIT

//! Leaf control state

use serde::{Deserialize, Serialize};

use super::{AbstractControlState, ControlFlags};
use crate::form::utils::ErrorMap;
use crate::form::value::FormValue;

/// State of a single scalar-valued control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormControlState {
    pub(crate) id: String,
    pub(crate) value: FormValue,
    #[serde(default)]
    pub(crate) errors: ErrorMap,
    #[serde(flatten)]
    pub(crate) flags: ControlFlags,
    #[serde(default)]
    pub(crate) is_focused: bool,
}

/// Create a control that is enabled, pristine, untouched, unsubmitted and valid
pub fn create_form_control_state(id: impl Into<String>, value: FormValue) -> FormControlState {
    FormControlState {
        id: id.into(),
        value,
        errors: ErrorMap::new(),
        flags: ControlFlags::default(),
        is_focused: false,
    }
}

impl FormControlState {
    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub fn is_unfocused(&self) -> bool {
        !self.is_focused
    }
}

impl AbstractControlState for FormControlState {
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
