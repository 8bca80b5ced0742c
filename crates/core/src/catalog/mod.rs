//! Product list screen state.

mod list_controller;
mod list_view;

pub use list_controller::*;
pub use list_view::*;
