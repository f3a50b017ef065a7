//! `stockcast-inventory` — the inventory read-model boundary.
//!
//! Inventory records are owned by an external store service; this crate
//! only defines the record shape the forecasting side reads, the read-only
//! [`InventorySource`] seam, and an in-memory implementation for tests,
//! dev, and the background runner.

pub mod item;
pub mod source;

pub use item::InventoryItem;
pub use source::{InMemoryInventoryStore, InventorySource};
