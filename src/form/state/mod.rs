// SPDX-License-Identifier: MIT

//! Form state tree
//!
//! This module provides:
//! - `ControlState` - a node of the tree, either a leaf control or a group
//! - `FormControlState` / `FormGroupState` - the two node variants
//! - `AbstractControlState` - read access shared by every node
//! - `compute_group_state` - derives a group's value, errors and flags from its children
//!
//! Nodes are immutable and shared through `Arc`. A reducer that changes
//! nothing hands back the same `Arc`, so callers can detect "no change"
//! with [`ControlState::ptr_eq`].

mod compute;
mod control;
mod group;

pub use compute::compute_group_state;
pub use control::{create_form_control_state, FormControlState};
pub use group::{create_form_group_state, Controls, FormGroupState};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::utils::{is_empty, ErrorMap};
use super::value::FormValue;

/// The positive half of each complementary flag pair.
///
/// Groups OR these over their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlFlags {
    pub is_enabled: bool,
    pub is_dirty: bool,
    pub is_touched: bool,
    pub is_submitted: bool,
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self {
            is_enabled: true,
            is_dirty: false,
            is_touched: false,
            is_submitted: false,
        }
    }
}

/// Read access common to leaf controls and groups
pub trait AbstractControlState {
    /// Dot-delimited id, unique within the tree
    fn id(&self) -> &str;

    fn value(&self) -> &FormValue;

    /// Full error map, including child-mirrored and async entries
    fn errors(&self) -> &ErrorMap;

    fn flags(&self) -> ControlFlags;

    fn is_valid(&self) -> bool {
        is_empty(self.errors())
    }

    fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    fn is_enabled(&self) -> bool {
        self.flags().is_enabled
    }

    fn is_disabled(&self) -> bool {
        !self.is_enabled()
    }

    fn is_dirty(&self) -> bool {
        self.flags().is_dirty
    }

    fn is_pristine(&self) -> bool {
        !self.is_dirty()
    }

    fn is_touched(&self) -> bool {
        self.flags().is_touched
    }

    fn is_untouched(&self) -> bool {
        !self.is_touched()
    }

    fn is_submitted(&self) -> bool {
        self.flags().is_submitted
    }

    fn is_unsubmitted(&self) -> bool {
        !self.is_submitted()
    }
}

/// A node of the form state tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ControlState {
    Control(Arc<FormControlState>),
    Group(Arc<FormGroupState>),
}

impl ControlState {
    /// Build a fresh node for `value`: objects become groups, everything else a leaf.
    pub fn from_value(id: impl Into<String>, value: FormValue) -> Self {
        match value {
            FormValue::Object(map) => {
                let fields = Arc::try_unwrap(map).unwrap_or_else(|shared| (*shared).clone());
                ControlState::Group(Arc::new(create_form_group_state(id, fields)))
            }
            other => ControlState::Control(Arc::new(create_form_control_state(id, other))),
        }
    }

    /// True if both point at the same node.
    pub fn ptr_eq(&self, other: &ControlState) -> bool {
        match (self, other) {
            (ControlState::Control(a), ControlState::Control(b)) => Arc::ptr_eq(a, b),
            (ControlState::Group(a), ControlState::Group(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ControlState::Group(_))
    }

    pub fn as_control(&self) -> Option<&Arc<FormControlState>> {
        match self {
            ControlState::Control(control) => Some(control),
            ControlState::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Arc<FormGroupState>> {
        match self {
            ControlState::Group(group) => Some(group),
            ControlState::Control(_) => None,
        }
    }

    /// Resolve a dot-delimited control id to this node or one of its descendants.
    pub fn find(&self, id: &str) -> Option<&ControlState> {
        if self.id() == id {
            return Some(self);
        }
        let group = self.as_group()?;
        group
            .controls()
            .values()
            .find(|child| is_same_or_descendant(id, child.id()))
            .and_then(|child| child.find(id))
    }
}

/// True if `id` names `ancestor` itself or something nested below it.
fn is_same_or_descendant(id: &str, ancestor: &str) -> bool {
    id.strip_prefix(ancestor)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

impl AbstractControlState for ControlState {
    fn id(&self) -> &str {
        match self {
            ControlState::Control(c) => c.id(),
            ControlState::Group(g) => g.id(),
        }
    }

    fn value(&self) -> &FormValue {
        match self {
            ControlState::Control(c) => c.value(),
            ControlState::Group(g) => g.value(),
        }
    }

    fn errors(&self) -> &ErrorMap {
        match self {
            ControlState::Control(c) => c.errors(),
            ControlState::Group(g) => g.errors(),
        }
    }

    fn flags(&self) -> ControlFlags {
        match self {
            ControlState::Control(c) => c.flags(),
            ControlState::Group(g) => g.flags(),
        }
    }
}

impl From<FormControlState> for ControlState {
    fn from(state: FormControlState) -> Self {
        ControlState::Control(Arc::new(state))
    }
}

impl From<FormGroupState> for ControlState {
    fn from(state: FormGroupState) -> Self {
        ControlState::Group(Arc::new(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> ControlState {
        ControlState::from_value(
            "form",
            json!({"name": "Ada", "address": {"city": "Oslo", "zip": "0150"}}).into(),
        )
    }

    #[test]
    fn test_from_value_picks_variant() {
        assert!(ControlState::from_value("a", json!({"x": 1}).into()).is_group());
        assert!(!ControlState::from_value("a", json!([1, 2]).into()).is_group());
        assert!(!ControlState::from_value("a", json!(null).into()).is_group());
    }

    #[test]
    fn test_find() {
        let state = tree();
        assert_eq!(state.find("form").map(|s| s.id()), Some("form"));
        assert_eq!(
            state.find("form.address.city").map(|s| s.value().clone()),
            Some(FormValue::from("Oslo"))
        );
        assert!(state.find("form.address.country").is_none());
        assert!(state.find("other").is_none());
        assert!(state.find("form.addressx").is_none());
    }

    #[test]
    fn test_default_flags() {
        let state = tree();
        assert!(state.is_valid());
        assert!(state.is_enabled());
        assert!(state.is_pristine());
        assert!(state.is_untouched());
        assert!(state.is_unsubmitted());
    }

    #[test]
    fn test_ptr_eq() {
        let state = tree();
        let copy = state.clone();
        assert!(state.ptr_eq(&copy));
        assert!(!state.ptr_eq(&tree()));
        assert_eq!(state, tree());
    }

    #[test]
    fn test_serde_roundtrip_keeps_shape() {
        let state = tree();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["kind"], "group");
        assert_eq!(json["controls"]["address"]["controls"]["city"]["kind"], "control");
        assert_eq!(json["controls"]["name"]["isEnabled"], true);

        let back: ControlState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
