//! Live collection snapshots.
//!
//! A [`LiveCollection`] fans the current full listing of a collection out to
//! any number of subscribers. Every publish replaces the previous snapshot
//! wholesale: a subscriber always observes the most recently published
//! listing, never an interleaving of two, and a slow subscriber skips
//! straight to the latest one (at-least-once, coalescing delivery).
//!
//! Subscriptions are disposable handles. A consumer that tears down must
//! dispose (or drop) its handle; the collection counts live listeners so a
//! leaked subscription is observable.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

/// Terminal delivery failure. Subscribers log it and stop; there is no
/// automatic retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("snapshot delivery failed: {message}")]
pub struct SnapshotError {
    message: String,
}

impl SnapshotError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A complete, point-in-time listing of a collection.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    /// Publish sequence number, increasing by one per publish.
    pub seq: u64,
    pub records: Arc<Vec<T>>,
}

/// What a subscriber currently observes.
#[derive(Debug, Clone)]
pub enum SnapshotState<T> {
    /// No snapshot published yet.
    Loading,
    Ready(Snapshot<T>),
    Failed(SnapshotError),
}

impl<T> SnapshotState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, SnapshotState::Loading)
    }
}

pub struct LiveCollection<T> {
    tx: watch::Sender<SnapshotState<T>>,
    listeners: Arc<AtomicUsize>,
    seq: AtomicU64,
}

impl<T: Clone> LiveCollection<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SnapshotState::Loading);
        Self {
            tx,
            listeners: Arc::new(AtomicUsize::new(0)),
            seq: AtomicU64::new(0),
        }
    }

    /// Replace the current snapshot with a fresh full listing.
    pub fn publish(&self, records: Vec<T>) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.tx.send_replace(SnapshotState::Ready(Snapshot {
            seq,
            records: Arc::new(records),
        }));
    }

    /// Mark the collection failed. Subscribers observe the failure once and
    /// are expected to stop; the next successful publish clears it.
    pub fn publish_error(&self, message: impl Into<String>) {
        self.tx
            .send_replace(SnapshotState::Failed(SnapshotError::new(message)));
    }

    pub fn subscribe(&self) -> SnapshotSubscription<T> {
        self.listeners.fetch_add(1, Ordering::SeqCst);
        SnapshotSubscription {
            rx: self.tx.subscribe(),
            listeners: Arc::clone(&self.listeners),
            disposed: false,
        }
    }

    /// Number of undisposed subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.load(Ordering::SeqCst)
    }
}

impl<T: Clone> Default for LiveCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A standing subscription. Dispose on teardown.
pub struct SnapshotSubscription<T> {
    rx: watch::Receiver<SnapshotState<T>>,
    listeners: Arc<AtomicUsize>,
    disposed: bool,
}

impl<T: Clone> SnapshotSubscription<T> {
    /// The state as of now, without waiting.
    pub fn current(&self) -> SnapshotState<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next publish after the last one observed, returning the
    /// latest state. Returns `None` once the collection itself is gone.
    pub async fn next(&mut self) -> Option<SnapshotState<T>> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// Release the subscription. Dropping the handle has the same effect;
    /// the explicit form exists so teardown sites read as teardown.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.listeners.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl<T> Drop for SnapshotSubscription<T> {
    fn drop(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.listeners.fetch_sub(1, Ordering::SeqCst);
        }
    }
}
