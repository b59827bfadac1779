// SPDX-License-Identifier: MIT

//! Immutable state-transition engine for hierarchical form state.
//!
//! A form is a tree of controls: leaves hold a single value, groups derive
//! their value, errors and flags from named children. Actions are applied
//! through [`form_state_reducer`], which returns the very same tree when
//! nothing changed and otherwise shares every untouched subtree with the
//! previous one.

pub mod error;
pub mod form;

pub use error::{FormError, ReducerError, Result};
pub use form::action::{Action, ActionKind};
pub use form::reducer::{form_control_reducer, form_group_reducer, form_state_reducer, reduce_all};
pub use form::state::{
    compute_group_state, create_form_control_state, create_form_group_state,
    AbstractControlState, ControlFlags, ControlState, Controls, FormControlState, FormGroupState,
};
pub use form::utils::ErrorMap;
pub use form::value::{FormObject, FormValue};
