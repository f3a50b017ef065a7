//! Inventory update notifications.
//!
//! These mirror what the live-update surface broadcasts to subscribed
//! clients after a stock-affecting mutation. All three notification kinds
//! share one logical channel so a subscriber sees the full update stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockcast_core::StoreId;

use crate::event::Event;

/// The single logical channel all inventory notifications are grouped under.
pub const INVENTORY_CHANNEL: &str = "inventory-updates";

/// Notification: an item's stock level changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockUpdated {
    pub store_id: StoreId,
    pub product_name: String,
    pub new_stock: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Notification: a new product was added to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub store_id: StoreId,
    pub product_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Notification: an item fell to or below its minimum stock level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub store_id: StoreId,
    pub product_name: String,
    pub current_stock: u32,
    pub minimum_stock: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryNotification {
    StockUpdated(StockUpdated),
    ProductAdded(ProductAdded),
    LowStockAlert(LowStockAlert),
}

impl Event for InventoryNotification {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryNotification::StockUpdated(_) => "inventory.stock.updated",
            InventoryNotification::ProductAdded(_) => "inventory.product.added",
            InventoryNotification::LowStockAlert(_) => "inventory.stock.low",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryNotification::StockUpdated(e) => e.occurred_at,
            InventoryNotification::ProductAdded(e) => e.occurred_at,
            InventoryNotification::LowStockAlert(e) => e.occurred_at,
        }
    }
}

/// Envelope for a published notification: channel + delivery metadata.
///
/// This is the unit handed to a transport. `event_id` allows subscribers to
/// deduplicate (delivery is at-least-once).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    event_id: Uuid,
    channel: String,
    payload: InventoryNotification,
}

impl NotificationEnvelope {
    /// Wrap a notification for the inventory channel.
    ///
    /// Uses UUIDv7 (time-ordered) event ids. Prefer passing ids explicitly
    /// in tests for determinism.
    pub fn new(payload: InventoryNotification) -> Self {
        Self::with_id(Uuid::now_v7(), payload)
    }

    pub fn with_id(event_id: Uuid, payload: InventoryNotification) -> Self {
        Self {
            event_id,
            channel: INVENTORY_CHANNEL.to_string(),
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn payload(&self) -> &InventoryNotification {
        &self.payload
    }

    pub fn into_payload(self) -> InventoryNotification {
        self.payload
    }
}
