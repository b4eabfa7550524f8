use async_trait::async_trait;

use crate::domain::order::{Order, OrderLine, OrderStatus};

#[derive(thiserror::Error, Debug)]
pub enum NotifyError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("could not render message: {0}")]
    Template(String),
}

/// Best-effort delivery of an order outcome to the customer.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(
        &self,
        order: &Order,
        items: &[OrderLine],
        status: OrderStatus,
    ) -> Result<(), NotifyError>;
}
