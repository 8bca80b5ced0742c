//! Transient success/error messages.

mod notice_state;

pub use notice_state::*;
