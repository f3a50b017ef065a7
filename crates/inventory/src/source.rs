//! Read-only access to inventory state.

use std::sync::Mutex;

use chrono::Utc;

use stockcast_core::{DomainError, DomainResult, ProductId, StoreId};

use crate::item::InventoryItem;

/// Read seam between the forecasting side and the system of record.
///
/// Implementations may be backed by a database, an HTTP client, or memory;
/// callers only ever read. Snapshot freshness is the implementation's
/// concern.
pub trait InventorySource: Send + Sync {
    /// All items across all stores, in a stable order.
    fn list_items(&self) -> DomainResult<Vec<InventoryItem>>;
}

/// In-memory inventory store for tests/dev.
///
/// Also carries the write operations the surrounding application performs
/// on its own copy of the data (upsert, stock updates), so integration
/// tests and the runner have a working collaborator. Insertion order is
/// preserved, which makes fleet-forecast tie ordering deterministic.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    items: Mutex<Vec<InventoryItem>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the item, or replace the record with the same
    /// (store, product) key.
    pub fn upsert(&self, item: InventoryItem) -> DomainResult<()> {
        item.validate()?;
        let mut items = self.items.lock().expect("inventory store lock poisoned");
        match items
            .iter_mut()
            .find(|i| i.store_id == item.store_id && i.product_id == item.product_id)
        {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Ok(())
    }

    /// Set a new absolute stock level and refresh `last_updated`.
    pub fn update_stock(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        new_stock: u32,
    ) -> DomainResult<InventoryItem> {
        let mut items = self.items.lock().expect("inventory store lock poisoned");
        let item = items
            .iter_mut()
            .find(|i| &i.store_id == store_id && &i.product_id == product_id)
            .ok_or(DomainError::NotFound)?;
        item.current_stock = new_stock;
        item.last_updated = Utc::now();
        Ok(item.clone())
    }

    /// Items at or below their configured minimum stock.
    pub fn low_stock_items(&self) -> Vec<InventoryItem> {
        self.items
            .lock()
            .expect("inventory store lock poisoned")
            .iter()
            .filter(|i| i.is_low_stock())
            .cloned()
            .collect()
    }
}

impl InventorySource for InMemoryInventoryStore {
    fn list_items(&self) -> DomainResult<Vec<InventoryItem>> {
        Ok(self
            .items
            .lock()
            .expect("inventory store lock poisoned")
            .clone())
    }
}
