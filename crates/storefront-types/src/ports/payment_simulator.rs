use async_trait::async_trait;

use crate::domain::order::OrderStatus;

/// Decides the outcome of a checkout's payment. Implementations must not
/// depend on order content.
#[async_trait]
pub trait PaymentSimulator: Send + Sync + 'static {
    async fn simulate(&self) -> OrderStatus;
}
