//! Error types for the product gateway client.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while talking to the product service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from the product service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid request (bad base URL, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<GatewayError> for prodcat_core::Error {
    fn from(err: GatewayError) -> Self {
        prodcat_core::Error::gateway(err.status_code(), err.to_string())
    }
}
