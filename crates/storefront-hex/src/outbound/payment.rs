use async_trait::async_trait;
use rand::Rng;
use storefront_types::domain::order::OrderStatus;
use storefront_types::ports::payment_simulator::PaymentSimulator;

/// Picks approved, declined or error with equal probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPaymentSimulator;

#[async_trait]
impl PaymentSimulator for RandomPaymentSimulator {
    async fn simulate(&self) -> OrderStatus {
        let idx = rand::rng().random_range(0..OrderStatus::ALL.len());
        OrderStatus::ALL[idx]
    }
}

/// Always returns the same outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixedPaymentSimulator {
    outcome: OrderStatus,
}

impl FixedPaymentSimulator {
    pub fn new(outcome: OrderStatus) -> Self {
        Self { outcome }
    }
}

#[async_trait]
impl PaymentSimulator for FixedPaymentSimulator {
    async fn simulate(&self) -> OrderStatus {
        self.outcome
    }
}
