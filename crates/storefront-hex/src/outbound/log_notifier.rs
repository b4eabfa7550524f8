use async_trait::async_trait;
use storefront_types::domain::order::{Order, OrderLine, OrderStatus};
use storefront_types::ports::notifier::{Notifier, NotifyError};

use super::message::OrderMessage;

/// Writes the composed message to the log instead of mailing it.
/// Used when no mail server is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        order: &Order,
        items: &[OrderLine],
        status: OrderStatus,
    ) -> Result<(), NotifyError> {
        let msg = OrderMessage::compose(order, items, status)?;
        tracing::info!(
            to = %msg.to,
            subject = %msg.subject,
            order_number = %order.order_number,
            "order email (not sent, mail disabled)"
        );
        tracing::debug!(body = %msg.text, "order email body");
        Ok(())
    }
}
