//! Error types for the product catalog core.

use thiserror::Error;

use crate::forms::FieldName;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the catalog screens.
#[derive(Debug, Error)]
pub enum Error {
    /// Any failure reported by the product gateway (transport, status, body)
    #[error("Gateway error: {message}")]
    Gateway {
        status: Option<u16>,
        message: String,
    },

    /// Submission was blocked because one or more fields failed validation
    #[error("Form is invalid: {}", join_fields(.0))]
    InvalidForm(Vec<FieldName>),

    /// Attempt to write a field the current form variant does not allow
    #[error("Field '{0}' is read-only")]
    ReadOnlyField(FieldName),

    /// Confirm was requested without a product pending deletion
    #[error("No product is pending deletion")]
    NoPendingDelete,

    /// A route path could not be resolved
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a gateway error with an optional HTTP status.
    pub fn gateway(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Gateway {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid route error
    pub fn invalid_route(message: impl Into<String>) -> Self {
        Self::InvalidRoute(message.into())
    }

    /// HTTP status if this is a gateway error that carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Gateway { status, .. } => *status,
            _ => None,
        }
    }

    /// True for failures that happened on the way to or from the gateway.
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }
}

fn join_fields(fields: &[FieldName]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
