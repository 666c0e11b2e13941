//! SQLite-backed record store.
//!
//! Writes go through the store's own connection. Each subscription runs a
//! dedicated watcher thread with a second connection that polls
//! `PRAGMA data_version`; the value moves whenever *another* connection
//! commits, so changes made by other processes (and by this store's own
//! writer connection) are picked up and pushed as a full snapshot.

use super::{RecordStore, Snapshot, StoreEvent, Subscription};
use crate::db::initialize::init_db;
use crate::db::pool::{DbPool, open_connection};
use crate::db::queries::{delete_driver, load_drivers, upsert_driver};
use crate::errors::{AppError, AppResult};
use crate::models::{DriverId, DriverRecord};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

pub struct SqliteStore {
    path: PathBuf,
    pool: DbPool,
    poll_interval: Duration,
}

impl SqliteStore {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: impl AsRef<Path>, poll_interval: Duration) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let pool = DbPool::new(&path)?;
        init_db(&pool.conn)?;
        Ok(Self {
            path,
            pool,
            poll_interval,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Direct read of the current collection, bypassing any feed.
    pub fn snapshot(&self) -> AppResult<Snapshot> {
        load_drivers(&self.pool.conn)
    }
}

impl RecordStore for SqliteStore {
    fn subscribe(&self) -> AppResult<Subscription> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));

        let path = self.path.clone();
        let interval = self.poll_interval;
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("driverdesk-feed".to_string())
            .spawn(move || watch_loop(&path, interval, &thread_stop, &tx))
            .map_err(|e| AppError::Feed(format!("failed to spawn feed thread: {e}")))?;

        log::debug!("live feed opened on {}", self.path.display());

        Ok(Subscription::new(rx, move || {
            stop.store(true, Ordering::SeqCst);
            handle.thread().unpark();
            if handle.join().is_err() {
                log::error!("live feed thread panicked");
            }
            log::debug!("live feed closed");
        }))
    }

    fn write(&self, id: &DriverId, record: &DriverRecord) -> AppResult<()> {
        upsert_driver(&self.pool.conn, id, record)
    }

    fn delete(&self, id: &DriverId) -> AppResult<()> {
        if !delete_driver(&self.pool.conn, id)? {
            log::debug!("delete of {id}: no such record");
        }
        Ok(())
    }
}

fn data_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA data_version", [], |row| row.get(0))
}

/// Body of the feed thread. Exits when stopped or when the receiver is gone.
fn watch_loop(path: &Path, interval: Duration, stop: &AtomicBool, tx: &Sender<StoreEvent>) {
    let conn = match open_connection(path) {
        Ok(c) => c,
        Err(e) => {
            let _ = tx.send(StoreEvent::Error(format!("cannot open feed connection: {e}")));
            return;
        }
    };

    let mut last_version: Option<i64> = None;
    let mut failing = false;

    while !stop.load(Ordering::SeqCst) {
        let polled = data_version(&conn)
            .map_err(AppError::from)
            .and_then(|v| {
                if last_version == Some(v) && !failing {
                    Ok(None)
                } else {
                    load_drivers(&conn).map(|snap| Some((v, snap)))
                }
            });

        let event = match polled {
            Ok(Some((v, snap))) => {
                last_version = Some(v);
                failing = false;
                Some(StoreEvent::Snapshot(snap))
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("live feed poll failed: {e}");
                // report once per failure streak
                let first = !failing;
                failing = true;
                first.then(|| StoreEvent::Error(e.to_string()))
            }
        };

        if let Some(ev) = event
            && tx.send(ev).is_err()
        {
            return;
        }

        thread::park_timeout(interval);
    }
}
