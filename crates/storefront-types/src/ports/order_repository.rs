use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::{NewOrder, Order};
use crate::domain::product::ProductId;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("product {0} does not exist")]
    UnknownProduct(ProductId),

    #[error("insufficient inventory for product {0}")]
    InsufficientInventory(ProductId),
}

/// Order Store.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    /// Persists the header and every line as one unit; nothing is kept if
    /// any part fails.
    ///
    /// For an approved order the stock of every line is taken inside the
    /// same unit, after the rows are written. Each decrement only applies
    /// while enough stock is left; otherwise the unit is rolled back with
    /// [`RepoError::InsufficientInventory`]. Declined and errored orders
    /// leave stock untouched.
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError>;

    async fn get_by_order_number(&self, order_number: Uuid) -> Result<Option<Order>, RepoError>;

    /// All orders with their lines, newest first.
    async fn list(&self) -> Result<Vec<Order>, RepoError>;
}
