//! `stockcast-events` — real-time inventory notifications.
//!
//! The forecasting core is a read-only analytics consumer; these types exist
//! so the surrounding application can fan stock-affecting changes out to
//! live subscribers (dashboards, alert feeds). Transport is abstracted
//! behind [`EventBus`]; only an in-memory implementation lives here.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod notification;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use notification::{
    INVENTORY_CHANNEL, InventoryNotification, LowStockAlert, NotificationEnvelope, ProductAdded,
    StockUpdated,
};
