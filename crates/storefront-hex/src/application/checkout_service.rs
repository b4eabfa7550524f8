use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{AppError, CheckoutError};
use storefront_types::domain::checkout::{CheckoutReceipt, CheckoutRequest};
use storefront_types::domain::order::{NewOrder, Order, OrderLine};
use storefront_types::domain::product::{Product, ProductId};
use storefront_types::ports::catalog_repository::CatalogRepository;
use storefront_types::ports::notifier::Notifier;
use storefront_types::ports::order_repository::{OrderRepository, RepoError};
use storefront_types::ports::payment_simulator::PaymentSimulator;
use tracing::Instrument;
use uuid::Uuid;

/// Checkout orchestrator: validates a request against the catalog, runs
/// the payment, records the order and tells the customer.
pub struct CheckoutService<R>
where
    R: CatalogRepository + OrderRepository,
{
    repo: R,
    payments: Arc<dyn PaymentSimulator>,
    notifier: Arc<dyn Notifier>,
}

impl<R> CheckoutService<R>
where
    R: CatalogRepository + OrderRepository,
{
    pub fn new(repo: R, payments: Arc<dyn PaymentSimulator>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo,
            payments,
            notifier,
        }
    }

    /// Every payment outcome is a successful checkout; only a request that
    /// cannot be placed returns an error, and then nothing was written.
    #[tracing::instrument(skip_all, fields(items = request.items.len()))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutReceipt, CheckoutError> {
        request.validate()?;

        // Resolve every product before looking at stock so an unknown id
        // is reported even when another line is short.
        let mut products: HashMap<ProductId, Product> = HashMap::new();
        for item in &request.items {
            if products.contains_key(&item.product_id) {
                continue;
            }
            let product = self
                .repo
                .get_product(item.product_id)
                .await
                .map_err(CheckoutError::Persistence)?
                .ok_or(CheckoutError::ProductNotFound(item.product_id))?;
            products.insert(product.id, product);
        }

        let mut requested: HashMap<ProductId, u32> = HashMap::new();
        let mut lines = Vec::with_capacity(request.items.len());
        for item in request.items {
            let product = products
                .get(&item.product_id)
                .ok_or(CheckoutError::ProductNotFound(item.product_id))?;
            let total = requested.entry(product.id).or_default();
            *total = total.saturating_add(item.quantity);
            if product.inventory < *total {
                return Err(CheckoutError::InsufficientInventory {
                    product_id: product.id,
                    title: product.title.clone(),
                });
            }
            lines.push(OrderLine::snapshot(product, item.variant, item.quantity));
        }

        let status = self.payments.simulate().await;
        tracing::debug!(%status, "payment simulated");

        let order = self
            .repo
            .create(NewOrder::new(request.customer, status, lines))
            .await
            .map_err(|e| match e {
                // Stock ran out between the check above and the commit.
                RepoError::InsufficientInventory(id) => CheckoutError::InsufficientInventory {
                    product_id: id,
                    title: products
                        .get(&id)
                        .map(|p| p.title.clone())
                        .unwrap_or_else(|| id.to_string()),
                },
                RepoError::UnknownProduct(id) => CheckoutError::ProductNotFound(id),
                other => CheckoutError::Persistence(other),
            })?;

        tracing::info!(
            order_number = %order.order_number,
            status = %order.status,
            total = %order.total(),
            "order placed"
        );

        let receipt = CheckoutReceipt {
            order_number: order.order_number,
            status: order.status,
        };
        self.notify(order);
        Ok(receipt)
    }

    /// Hands the order to the notifier on its own task. Failures and panics
    /// stay inside that task.
    fn notify(&self, order: Order) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(
            async move {
                if let Err(err) = notifier.send(&order, &order.items, order.status).await {
                    tracing::warn!(
                        order_number = %order.order_number,
                        error = %err,
                        "order notification failed"
                    );
                }
            }
            .in_current_span(),
        );
    }

    pub async fn get_order(&self, order_number: Uuid) -> Result<Order, AppError> {
        match self.repo.get_by_order_number(order_number).await? {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("order {}", order_number))),
        }
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.repo.list().await?)
    }
}
