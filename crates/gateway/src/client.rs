//! Product service API client.
//!
//! One HTTP request per operation against the `/bp/products` REST surface.
//! No retries and no timeout override: failures go straight back to the caller.

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

use prodcat_core::products::{ProductCollection, ProductGatewayTrait, ProductItem};

use crate::error::{GatewayError, Result};
use crate::types::{ApiErrorResponse, SavedProductResponse};

const PRODUCTS_PATH: &str = "/bp/products";
const VERIFICATION_PATH: &str = "/bp/products/verification";
const MAX_LOG_BODY_CHARS: usize = 512;

/// Client for the product catalog REST service.
#[derive(Debug, Clone)]
pub struct ProductApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProductApiClient {
    fn body_preview(body: &str) -> String {
        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        preview
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("API response status: {}", status);
            return;
        }
        debug!("API response error ({}): {}", status, Self::body_preview(body));
    }

    /// Create a new product API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Origin of the product service (e.g., "http://localhost:3002")
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .default_headers(Self::default_headers())
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client, using defaults without JSON headers: {}", e);
                reqwest::Client::new()
            });
        Self::with_client(client, base_url)
    }

    /// Use an already configured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    fn products_url(&self) -> String {
        format!("{}{}", self.base_url, PRODUCTS_PATH)
    }

    fn product_url(&self, id: &str) -> Result<String> {
        Ok(format!(
            "{}{}/{}",
            self.base_url,
            PRODUCTS_PATH,
            Self::encode_id(id)?
        ))
    }

    fn verification_url(&self, id: &str) -> Result<String> {
        Ok(format!(
            "{}{}/{}",
            self.base_url,
            VERIFICATION_PATH,
            Self::encode_id(id)?
        ))
    }

    fn encode_id(id: &str) -> Result<String> {
        if id.trim().is_empty() {
            return Err(GatewayError::invalid_request("Product id must not be empty"));
        }
        Ok(urlencoding::encode(id).into_owned())
    }

    /// Turn a non-success response into an API error.
    fn api_error(status: reqwest::StatusCode, body: &str) -> GatewayError {
        if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(body) {
            let message = match error.name {
                Some(name) => format!("{}: {}", name, error.message),
                None => error.message,
            };
            return GatewayError::api(status.as_u16(), message);
        }
        GatewayError::api(status.as_u16(), format!("Request failed: {}", body))
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            return Err(Self::api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                Self::body_preview(&body),
                e
            );
            GatewayError::from(e)
        })
    }

    /// Check the status of a response whose body carries nothing we need.
    async fn expect_success(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            return Err(Self::api_error(status, &body));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Products
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the whole catalog.
    ///
    /// GET /bp/products
    pub async fn get_products(&self) -> Result<ProductCollection> {
        let url = self.products_url();
        debug!("Fetching products: {}", url);

        let response = self.client.get(&url).send().await?;

        Self::parse_response(response).await
    }

    /// Create a product.
    ///
    /// POST /bp/products
    pub async fn add_product(&self, product: &ProductItem) -> Result<ProductItem> {
        let url = self.products_url();
        debug!("Creating product: {:?}", product);

        let response = self.client.post(&url).json(product).send().await?;

        let saved: SavedProductResponse = Self::parse_response(response).await?;
        Ok(saved.into_product())
    }

    /// Replace a product.
    ///
    /// PUT /bp/products/{id}
    pub async fn replace_product(&self, id: &str, product: &ProductItem) -> Result<ProductItem> {
        let url = self.product_url(id)?;
        debug!("Updating product {}: {:?}", id, product);

        let response = self.client.put(&url).json(product).send().await?;

        let saved: SavedProductResponse = Self::parse_response(response).await?;
        Ok(saved.into_product())
    }

    /// Delete a product.
    ///
    /// DELETE /bp/products/{id}
    pub async fn remove_product(&self, id: &str) -> Result<()> {
        let url = self.product_url(id)?;
        debug!("Deleting product {}", id);

        let response = self.client.delete(&url).send().await?;

        Self::expect_success(response).await
    }

    /// Whether an id is already in use.
    ///
    /// GET /bp/products/verification/{id}
    pub async fn validate_id(&self, id: &str) -> Result<bool> {
        let url = self.verification_url(id)?;

        let response = self.client.get(&url).send().await?;

        Self::parse_response(response).await
    }
}

#[async_trait]
impl ProductGatewayTrait for ProductApiClient {
    async fn list_products(&self) -> prodcat_core::Result<Vec<ProductItem>> {
        Ok(self.get_products().await?.into_items())
    }

    async fn create_product(&self, product: &ProductItem) -> prodcat_core::Result<ProductItem> {
        Ok(self.add_product(product).await?)
    }

    async fn update_product(
        &self,
        id: &str,
        product: &ProductItem,
    ) -> prodcat_core::Result<ProductItem> {
        Ok(self.replace_product(id, product).await?)
    }

    async fn delete_product(&self, id: &str) -> prodcat_core::Result<()> {
        Ok(self.remove_product(id).await?)
    }

    async fn product_id_exists(&self, id: &str) -> prodcat_core::Result<bool> {
        Ok(self.validate_id(id).await?)
    }
}
