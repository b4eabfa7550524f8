use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{require, ValidationError};

pub type ProductId = i64;

/// Variant dimension name (e.g. `color`) to the ordered options offered for it.
pub type VariantOptions = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub inventory: u32,
    #[serde(default)]
    pub variant_options: VariantOptions,
}

/// Catalog entry as submitted by a client, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub inventory: u32,
    #[serde(default)]
    pub variant_options: VariantOptions,
}

impl NewProduct {
    /// Checks the entry and normalises the price to cents.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        require("title", &self.title)?;
        if self.price < Decimal::ZERO {
            return Err(ValidationError::new("price", "must not be negative"));
        }
        self.price = self.price.round_dp(2);
        Ok(self)
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            inventory: self.inventory,
            variant_options: self.variant_options,
        }
    }
}
