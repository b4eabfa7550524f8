use async_trait::async_trait;

use super::order_repository::RepoError;
use crate::domain::product::{NewProduct, Product, ProductId};

#[async_trait]
pub trait CatalogRepository: Send + Sync + 'static {
    async fn create_product(&self, product: NewProduct) -> Result<Product, RepoError>;
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepoError>;
    /// Ordered by ascending id.
    async fn list_products(&self) -> Result<Vec<Product>, RepoError>;
}
