use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockcast_core::{DomainError, DomainResult, ProductId, StoreId};

/// A store-level inventory record as the external inventory service
/// exposes it. Value-like and short-lived: the forecasting side reads a
/// fresh snapshot per request and never mutates records through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub product_name: String,
    pub current_stock: u32,
    pub minimum_stock: u32,
    /// Unit price. Finite and non-negative (validated on construction).
    pub price_point: f64,
    pub category: String,
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(
        store_id: StoreId,
        product_id: ProductId,
        product_name: impl Into<String>,
        current_stock: u32,
        minimum_stock: u32,
        price_point: f64,
        category: impl Into<String>,
    ) -> DomainResult<Self> {
        let item = Self {
            store_id,
            product_id,
            product_name: product_name.into(),
            current_stock,
            minimum_stock,
            price_point,
            category: category.into(),
            last_updated: Utc::now(),
        };
        item.validate()?;
        Ok(item)
    }

    /// Check the record invariants (used on construction and on ingest of
    /// externally-sourced records).
    pub fn validate(&self) -> DomainResult<()> {
        if self.product_name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if !self.price_point.is_finite() {
            return Err(DomainError::validation("price point must be finite"));
        }
        if self.price_point < 0.0 {
            return Err(DomainError::validation("price point cannot be negative"));
        }
        Ok(())
    }

    /// Whether the item sits at or below its configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item(price: f64) -> DomainResult<InventoryItem> {
        InventoryItem::new(
            StoreId::new("STORE001").unwrap(),
            ProductId::new("SKU-1").unwrap(),
            "Widget",
            25,
            10,
            price,
            "hardware",
        )
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(test_item(-1.0).is_err());
        assert!(test_item(f64::NAN).is_err());
        assert!(test_item(19.99).is_ok());
    }

    #[test]
    fn low_stock_is_inclusive_of_the_minimum() {
        let mut item = test_item(5.0).unwrap();
        item.current_stock = 10;
        assert!(item.is_low_stock());
        item.current_stock = 11;
        assert!(!item.is_low_stock());
    }
}
