use crate::errors::AppError;
use storefront_types::domain::product::{NewProduct, Product, ProductId};
use storefront_types::ports::catalog_repository::CatalogRepository;

pub struct CatalogService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let product = product.validate()?;
        let created = self.repo.create_product(product).await?;
        tracing::info!(product_id = created.id, title = %created.title, "product created");
        Ok(created)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, AppError> {
        match self.repo.get_product(id).await? {
            Some(p) => Ok(p),
            None => Err(AppError::NotFound(format!("product {}", id))),
        }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.repo.list_products().await?)
    }

    /// Loads `products` only into an empty catalog. Returns how many were added.
    pub async fn seed_if_empty(&self, products: Vec<NewProduct>) -> Result<usize, AppError> {
        if !self.repo.list_products().await?.is_empty() {
            tracing::debug!("catalog already populated, skipping seed");
            return Ok(0);
        }
        let mut added = 0;
        for product in products {
            self.create_product(product).await?;
            added += 1;
        }
        tracing::info!(added, "catalog seeded");
        Ok(added)
    }
}
