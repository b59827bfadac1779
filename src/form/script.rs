// SPDX-License-Identifier: MIT

//! Replay scripts - YAML/JSON loading and execution
//!
//! A script names an initial form and an ordered list of actions:
//!
//! ```yaml
//! form:
//!   id: contact
//!   value: { name: "", email: "" }
//! actions:
//!   - type: SET_VALUE
//!     controlId: contact.name
//!     payload: { value: Ada }
//!   - type: MARK_AS_DIRTY
//!     controlId: contact.name
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::action::Action;
use super::reducer::form_state_reducer;
use super::state::ControlState;
use super::value::FormValue;
use crate::error::{FormError, Result};

/// Initial form of a script
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormDefinition {
    /// Id of the root control
    pub id: String,
    /// Initial value; objects become groups
    #[serde(default)]
    pub value: FormValue,
}

/// A form plus the actions to replay against it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormScript {
    pub form: FormDefinition,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl FormScript {
    /// The tree before any action is applied
    pub fn initial_state(&self) -> ControlState {
        ControlState::from_value(self.form.id.clone(), self.form.value.clone())
    }

    /// Fold every action through the reducer, in order.
    pub fn run(&self) -> Result<ControlState> {
        let initial = self.initial_state();
        self.actions
            .iter()
            .enumerate()
            .try_fold(initial, |state, (index, action)| {
                let next = form_state_reducer(&state, action)?;
                log::debug!(
                    "Action {} ({} -> '{}'){}",
                    index + 1,
                    action.kind,
                    action.control_id,
                    if next.ptr_eq(&state) { " changed nothing" } else { "" }
                );
                Ok(next)
            })
    }

    fn validate(self) -> Result<Self> {
        if self.form.id.trim().is_empty() {
            return Err(FormError::script("form id must not be empty"));
        }
        if self.form.id.split('.').any(str::is_empty) {
            return Err(FormError::script(format!(
                "form id '{}' has an empty path segment",
                self.form.id
            )));
        }
        Ok(self)
    }
}

/// Loads scripts and values from YAML or JSON files
pub struct ScriptLoader;

impl ScriptLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a script; `.json` files are parsed as JSON, everything else as YAML
    pub fn load_script<P: AsRef<Path>>(&self, path: P) -> Result<FormScript> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        if is_json(path) {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Load a bare form value
    pub fn load_value<P: AsRef<Path>>(&self, path: P) -> Result<FormValue> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let value = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(value)
    }

    /// Parse a script from a YAML string
    pub fn parse_yaml(content: &str) -> Result<FormScript> {
        let script: FormScript = serde_yaml::from_str(content)?;
        script.validate()
    }

    /// Parse a script from a JSON string
    pub fn parse_json(content: &str) -> Result<FormScript> {
        let script: FormScript = serde_json::from_str(content)?;
        script.validate()
    }
}

impl Default for ScriptLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
