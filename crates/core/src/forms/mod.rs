//! Product forms: field rules, the create/edit form state and editor sessions.

mod field_rules;
mod product_editor;
mod product_form;

pub use field_rules::*;
pub use product_editor::*;
pub use product_form::*;
