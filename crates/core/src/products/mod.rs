//! Product domain models, date rules and the gateway contract.

mod products_model;
mod products_traits;
mod revision_date;

pub use products_model::*;
pub use products_traits::*;
pub use revision_date::*;
