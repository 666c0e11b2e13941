//! In-process record store. Pushes a snapshot to every live subscriber
//! synchronously on each change. Failures can be injected per id.

use super::{RecordStore, Snapshot, StoreEvent, Subscription};
use crate::errors::{AppError, AppResult};
use crate::models::{Driver, DriverId, DriverRecord};
use std::collections::{BTreeMap, HashSet};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    records: BTreeMap<DriverId, DriverRecord>,
    subscribers: Vec<(u64, Sender<StoreEvent>)>,
    next_subscriber: u64,
    failing_deletes: HashSet<DriverId>,
    delete_calls: Vec<DriverId>,
}

impl Inner {
    fn snapshot(&self) -> Snapshot {
        self.records
            .iter()
            .map(|(id, r)| Driver::new(id.clone(), r.clone()))
            .collect()
    }

    fn broadcast(&mut self, event: StoreEvent) {
        // receivers that went away are forgotten
        self.subscribers
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }
}

/// Cloning yields another handle onto the same collection.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = Driver>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for d in records {
                inner.records.insert(d.id, d.record);
            }
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // a panicking test thread must not wedge the other handles
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &DriverId) -> Option<DriverRecord> {
        self.lock().records.get(id).cloned()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Make every future delete of `id` fail.
    pub fn fail_deletes_for(&self, id: impl Into<DriverId>) {
        self.lock().failing_deletes.insert(id.into());
    }

    /// Ids passed to `delete`, in call order.
    pub fn delete_calls(&self) -> Vec<DriverId> {
        self.lock().delete_calls.clone()
    }

    /// Push an error event to every subscriber.
    pub fn inject_feed_error(&self, message: impl Into<String>) {
        self.lock().broadcast(StoreEvent::Error(message.into()));
    }

    /// Remove a record without going through `delete`, as another client
    /// would, and notify subscribers.
    pub fn remove_externally(&self, id: &DriverId) {
        let mut inner = self.lock();
        if inner.records.remove(id).is_some() {
            let snap = inner.snapshot();
            inner.broadcast(StoreEvent::Snapshot(snap));
        }
    }
}

impl RecordStore for MemoryStore {
    fn subscribe(&self) -> AppResult<Subscription> {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.lock();

        tx.send(StoreEvent::Snapshot(inner.snapshot()))
            .map_err(|e| AppError::Feed(e.to_string()))?;

        let key = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.subscribers.push((key, tx));

        let shared = Arc::clone(&self.inner);
        Ok(Subscription::new(rx, move || {
            let mut inner = shared.lock().unwrap_or_else(|p| p.into_inner());
            inner.subscribers.retain(|(k, _)| *k != key);
        }))
    }

    fn write(&self, id: &DriverId, record: &DriverRecord) -> AppResult<()> {
        let mut inner = self.lock();
        inner.records.insert(id.clone(), record.clone());
        let snap = inner.snapshot();
        inner.broadcast(StoreEvent::Snapshot(snap));
        Ok(())
    }

    fn delete(&self, id: &DriverId) -> AppResult<()> {
        let mut inner = self.lock();
        inner.delete_calls.push(id.clone());

        if inner.failing_deletes.contains(id) {
            return Err(AppError::Store(format!("permission denied for {id}")));
        }

        if inner.records.remove(id).is_some() {
            let snap = inner.snapshot();
            inner.broadcast(StoreEvent::Snapshot(snap));
        }
        Ok(())
    }
}
