//! Screen routing.

mod route;

pub use route::*;
