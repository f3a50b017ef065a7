//! Notification publishing/subscription abstraction (mechanics only).
//!
//! A lightweight pub/sub seam between the application and whatever carries
//! live updates to clients (in-memory channels for tests, a websocket or
//! message-broker adapter in production). The bus makes minimal
//! assumptions:
//!
//! - **Transport-agnostic**: implementations own delivery mechanics.
//! - **At-least-once**: messages may be delivered more than once;
//!   subscribers deduplicate via the envelope's event id.
//! - **No persistence**: the bus distributes, it does not store. Inventory
//!   state of record lives with the inventory service.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a notification stream.
///
/// Each subscription gets a copy of every message published to the bus
/// (broadcast semantics). Designed for single-threaded consumption; hand
/// the subscription to one consumer thread.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic notification bus (pub/sub abstraction).
///
/// `publish()` can fail (bus full, transport error); failures surface to
/// the caller, which may retry. The trait requires `Send + Sync` so
/// multiple threads can publish concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
