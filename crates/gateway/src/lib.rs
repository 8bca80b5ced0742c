//! REST client for the product catalog service.
//!
//! [`ProductApiClient`] speaks the `/bp/products` API and implements
//! [`prodcat_core::products::ProductGatewayTrait`] so the core screens can use it.

pub mod client;
pub mod error;
pub mod types;

pub use client::ProductApiClient;
pub use error::{GatewayError, Result};
pub use types::*;
