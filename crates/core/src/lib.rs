//! Core of the product catalog client.
//!
//! Holds the product model, the gateway contract, form validation, the list
//! controller and the transient-notice machinery. HTTP lives in
//! `prodcat-gateway`; nothing here performs I/O except through
//! [`products::ProductGatewayTrait`].

pub mod catalog;
pub mod config;
pub mod errors;
pub mod forms;
pub mod navigation;
pub mod notices;
pub mod products;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::CatalogConfig;
pub use errors::{Error, Result};
