//! Ports onto the remote document collections.
//!
//! The portal treats its collections as remote, server-authoritative
//! storage: clients only ever hold transient snapshots. Each trait exposes
//! typed errors so adapters map their failures into predictable variants.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Event, EventDraft, EventPatch, Notice, NoticeDraft, ProfilePatch, Registration, UserProfile,
    UserRecord,
};

pub mod memory;
pub mod postgres;

pub use memory::{
    MemoryEventStore, MemoryNoticeStore, MemoryProfileStore, MemoryRegistrationStore,
    MemoryUserStore,
};
pub use postgres::{PgEventStore, PgNoticeStore, PgProfileStore, PgRegistrationStore, PgUserStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// The events collection. Listings are ordered by creation time, newest
/// first; that ordering is what the live feed subscribes on.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Event>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError>;
    /// Insert with a server-assigned id and `created_at == updated_at`.
    async fn insert(&self, draft: EventDraft) -> Result<Event, StoreError>;
    /// Merge-update: absent patch fields are untouched, `updated_at` is
    /// refreshed. `NotFound` if the id is unknown.
    async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn find(&self, event_id: Uuid, user_id: Uuid)
        -> Result<Option<Registration>, StoreError>;
    async fn insert(&self, event_id: Uuid, user_id: Uuid) -> Result<Registration, StoreError>;
    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Registration>, StoreError>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Registration>, StoreError>;
}

#[async_trait]
pub trait NoticeStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Notice>, StoreError>;
    async fn insert(&self, draft: NoticeDraft) -> Result<Notice, StoreError>;
    async fn update(&self, id: Uuid, draft: NoticeDraft) -> Result<Notice, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError>;
    /// Merge-upsert: creates the profile row on first write.
    async fn upsert(&self, user_id: Uuid, patch: ProfilePatch) -> Result<UserProfile, StoreError>;
}

/// Accounts, as the auth service sees them.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;
    async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<UserRecord, StoreError>;
    async fn update_identity(
        &self,
        id: Uuid,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<UserRecord, StoreError>;
    async fn update_password_hash(&self, id: Uuid, password_hash: &str)
        -> Result<(), StoreError>;
}
