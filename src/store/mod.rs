//! Record store client: the seam between the roster logic and whatever
//! backend holds the driver collection.
//!
//! A store offers three things: a live feed that pushes the *whole*
//! collection after every change, an upsert by key and an idempotent
//! delete by key.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::errors::AppResult;
use crate::models::{Driver, DriverId, DriverRecord};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// Full collection as pushed by the store, ordered by id.
pub type Snapshot = Vec<Driver>;

/// One item delivered by a live feed.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Snapshot(Snapshot),
    Error(String),
}

pub trait RecordStore {
    /// Open a live feed over the full driver collection. The first event
    /// is the current state of the collection.
    fn subscribe(&self) -> AppResult<Subscription>;

    /// Upsert: the whole stored value under `id` is replaced.
    fn write(&self, id: &DriverId, record: &DriverRecord) -> AppResult<()>;

    /// Remove `id`. Removing a missing id succeeds.
    fn delete(&self, id: &DriverId) -> AppResult<()>;
}

/// Handle over a live feed. Dropping it cancels the feed; the store stops
/// producing events before `drop` returns.
pub struct Subscription {
    events: Receiver<StoreEvent>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

/// Result of polling a subscription.
#[derive(Debug, PartialEq)]
pub enum Poll {
    Event(StoreEvent),
    Empty,
    Disconnected,
}

impl Subscription {
    pub fn new(events: Receiver<StoreEvent>, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            events,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Non-blocking poll.
    pub fn poll(&self) -> Poll {
        match self.events.try_recv() {
            Ok(ev) => Poll::Event(ev),
            Err(TryRecvError::Empty) => Poll::Empty,
            Err(TryRecvError::Disconnected) => Poll::Disconnected,
        }
    }

    /// Block for at most `timeout` waiting for the next event.
    pub fn poll_timeout(&self, timeout: Duration) -> Poll {
        match self.events.recv_timeout(timeout) {
            Ok(ev) => Poll::Event(ev),
            Err(RecvTimeoutError::Timeout) => Poll::Empty,
            Err(RecvTimeoutError::Disconnected) => Poll::Disconnected,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
