// SPDX-License-Identifier: MIT

pub mod action;
pub mod reducer;
pub mod script;
pub mod state;
pub mod utils;
pub mod value;
