use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::{Product, ProductId};
use super::validation::{require, ValidationError};

/// Chosen option per variant dimension, copied into the order at checkout.
pub type Variant = BTreeMap<String, String>;

/// Outcome of the payment transaction. Set once when the order is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Approved,
    Declined,
    Error,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [Self::Approved, Self::Declined, Self::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Error => "error",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown order status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            "error" => Ok(Self::Error),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Contact and shipping details of the buyer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Customer {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("full_name", &self.full_name)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("address", &self.address)?;
        require("city", &self.city)?;
        require("state", &self.state)?;
        require("zip", &self.zip)?;
        if !looks_like_email(self.email.trim()) {
            return Err(ValidationError::new("email", "is not a valid address"));
        }
        if !looks_like_phone(&self.phone) {
            return Err(ValidationError::new("phone", "must be 10 digits"));
        }
        Ok(())
    }
}

// Separators are allowed between the digits: `555-123-4567`, `(555) 123 4567`.
fn looks_like_phone(phone: &str) -> bool {
    let mut digits = 0;
    for c in phone.trim().chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return false,
        }
    }
    digits == 10
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.contains('@'))
}

/// One purchased product inside an order. Title and price are the values
/// the product had when the order was placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub title: String,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    #[serde(default)]
    pub variant: Variant,
    pub quantity: u32,
}

impl OrderLine {
    pub fn snapshot(product: &Product, variant: Variant, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            variant,
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An order ready to be persisted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_number: Uuid,
    pub customer: Customer,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
}

impl NewOrder {
    pub fn new(customer: Customer, status: OrderStatus, items: Vec<OrderLine>) -> Self {
        Self {
            order_number: Uuid::new_v4(),
            customer,
            status,
            items,
        }
    }

    /// Requested quantity per product, summed across lines.
    pub fn quantities(&self) -> BTreeMap<ProductId, u32> {
        let mut totals = BTreeMap::new();
        for line in &self.items {
            let total: &mut u32 = totals.entry(line.product_id).or_default();
            *total = total.saturating_add(line.quantity);
        }
        totals
    }

    pub fn into_order(self, id: i64, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            order_number: self.order_number,
            customer: self.customer,
            status: self.status,
            created_at,
            items: self.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub order_number: Uuid,
    #[serde(flatten)]
    pub customer: Customer,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderLine>,
}

impl Order {
    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderLine::line_total).sum()
    }
}
