//! The live events feed.
//!
//! All event mutations go through the feed so that every change republishes
//! a full, freshly ordered snapshot to the live subscribers. A failed
//! reload poisons the snapshot channel with a delivery error instead of
//! retrying; the mutation that triggered it still reports its own result.

use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::live::{LiveCollection, SnapshotSubscription};
use crate::models::{Event, EventDraft, EventPatch};
use crate::store::{EventStore, StoreError};

pub struct EventFeed {
    store: Arc<dyn EventStore>,
    live: LiveCollection<Event>,
}

impl EventFeed {
    /// Wrap a store and publish the initial snapshot from it.
    pub async fn new(store: Arc<dyn EventStore>) -> Result<Self, StoreError> {
        let feed = Self {
            store,
            live: LiveCollection::new(),
        };
        let events = feed.store.list().await?;
        feed.live.publish(events);
        Ok(feed)
    }

    pub fn subscribe(&self) -> SnapshotSubscription<Event> {
        self.live.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.live.listener_count()
    }

    pub async fn list(&self) -> Result<Vec<Event>, StoreError> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        self.store.get(id).await
    }

    pub async fn create(&self, draft: EventDraft) -> Result<Event, StoreError> {
        let event = self.store.insert(draft).await?;
        self.refresh().await;
        Ok(event)
    }

    pub async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event, StoreError> {
        let event = self.store.update(id, patch).await?;
        self.refresh().await;
        Ok(event)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        self.refresh().await;
        Ok(())
    }

    async fn refresh(&self) {
        match self.store.list().await {
            Ok(events) => self.live.publish(events),
            Err(err) => {
                error!(error = ?err, "failed to reload events for live snapshot");
                self.live.publish_error("failed to reload events");
            }
        }
    }
}
