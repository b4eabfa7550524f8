use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::{Customer, OrderStatus, Variant};
use super::payment::PaymentCard;
use super::product::ProductId;
use super::validation::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub variant: Variant,
    pub quantity: u32,
}

/// What the checkout flow needs once the payment fields have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub customer: Customer,
    pub items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::new(
                "items",
                "order must contain at least one item",
            ));
        }
        for (idx, item) in self.items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(ValidationError::new(
                    format!("items[{idx}].quantity"),
                    "must be at least 1",
                ));
            }
        }
        self.customer.validate()
    }
}

/// Body of `POST /orders/checkout`: shipping and payment fields sit at the
/// top level next to `items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutPayload {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(flatten)]
    pub payment: PaymentCard,
    pub items: Vec<CheckoutItem>,
}

impl CheckoutPayload {
    /// Splits off the payment card; it is not passed any further.
    pub fn into_parts(self) -> (CheckoutRequest, PaymentCard) {
        (
            CheckoutRequest {
                customer: self.customer,
                items: self.items,
            },
            self.payment,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_number: Uuid,
    pub status: OrderStatus,
}
