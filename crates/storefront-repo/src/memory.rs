use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use storefront_types::domain::order::{NewOrder, Order};
use storefront_types::domain::product::{NewProduct, Product, ProductId};
use storefront_types::ports::catalog_repository::CatalogRepository;
use storefront_types::ports::order_repository::{OrderRepository, RepoError};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Clone)]
pub struct InMemoryRepo {
    products: Arc<DashMap<ProductId, Product>>,
    orders: Arc<DashMap<Uuid, Order>>,
    product_seq: Arc<AtomicI64>,
    order_seq: Arc<AtomicI64>,
    // Held while an order is written so the stock check, the decrement
    // and the insert are seen as one step by other writers.
    write_gate: Arc<Mutex<()>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            products: Arc::new(DashMap::new()),
            orders: Arc::new(DashMap::new()),
            product_seq: Arc::new(AtomicI64::new(0)),
            order_seq: Arc::new(AtomicI64::new(0)),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    fn available(&self, id: ProductId) -> Option<u32> {
        self.products.get(&id).map(|p| p.inventory)
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryRepo {
    async fn create_product(&self, product: NewProduct) -> Result<Product, RepoError> {
        let id = self.product_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let product = product.into_product(id);
        self.products.insert(id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepoError> {
        Ok(self.products.get(&id).map(|r| r.clone()))
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepoError> {
        let mut products: Vec<Product> = self.products.iter().map(|kv| kv.value().clone()).collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        let _gate = self.write_gate.lock().await;

        if self.orders.contains_key(&order.order_number) {
            return Err(RepoError::Conflict(format!(
                "order number {} already exists",
                order.order_number
            )));
        }
        if let Some(line) = order
            .items
            .iter()
            .find(|line| !self.products.contains_key(&line.product_id))
        {
            return Err(RepoError::UnknownProduct(line.product_id));
        }

        if order.status.is_approved() {
            let wanted = order.quantities();
            for (&id, &qty) in &wanted {
                if self.available(id).unwrap_or(0) < qty {
                    return Err(RepoError::InsufficientInventory(id));
                }
            }
            for (id, qty) in wanted {
                if let Some(mut product) = self.products.get_mut(&id) {
                    product.inventory -= qty;
                }
            }
        }

        let id = self.order_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let created = order.into_order(id, Utc::now());
        self.orders.insert(created.order_number, created.clone());
        Ok(created)
    }

    async fn get_by_order_number(&self, order_number: Uuid) -> Result<Option<Order>, RepoError> {
        Ok(self.orders.get(&order_number).map(|r| r.clone()))
    }

    async fn list(&self) -> Result<Vec<Order>, RepoError> {
        let mut orders: Vec<Order> = self.orders.iter().map(|kv| kv.value().clone()).collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }
}
