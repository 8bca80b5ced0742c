use async_trait::async_trait;

use super::ProductItem;
use crate::errors::Result;

/// Access to the remote product service.
///
/// One call per operation: no retry, no batching. Implementations surface any
/// failure as [`crate::Error::Gateway`] without interpreting it.
#[async_trait]
pub trait ProductGatewayTrait: Send + Sync {
    /// Fetch the full product collection.
    async fn list_products(&self) -> Result<Vec<ProductItem>>;

    async fn create_product(&self, product: &ProductItem) -> Result<ProductItem>;

    async fn update_product(&self, id: &str, product: &ProductItem) -> Result<ProductItem>;

    async fn delete_product(&self, id: &str) -> Result<()>;

    /// Whether a product with this id already exists.
    async fn product_id_exists(&self, id: &str) -> Result<bool>;
}
