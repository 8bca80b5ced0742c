//! Wire types specific to the product service responses.

use prodcat_core::products::ProductItem;
use serde::Deserialize;

/// Error body returned by the service on non-success responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub message: String,
}

/// Create/update responses come back either bare or wrapped with a message.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SavedProductResponse {
    Wrapped {
        #[serde(default)]
        message: Option<String>,
        data: ProductItem,
    },
    Bare(ProductItem),
}

impl SavedProductResponse {
    pub fn into_product(self) -> ProductItem {
        match self {
            Self::Wrapped { data, .. } => data,
            Self::Bare(product) => product,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Wrapped { message, .. } => message.as_deref(),
            Self::Bare(_) => None,
        }
    }
}
