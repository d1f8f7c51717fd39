//! In-memory adapters, used as test doubles for the Postgres adapters.
//!
//! Timestamps are handed out by a per-store monotonic clock so that
//! `updated_at` strictly advances on every write, mirroring the
//! server-assigned monotonic timestamps of the real collections.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{
    EventStore, NoticeStore, ProfileStore, RegistrationStore, StoreError, UserStore,
};
use crate::models::{
    Event, EventDraft, EventPatch, Notice, NoticeDraft, ProfilePatch, Registration, UserProfile,
    UserRecord,
};

#[derive(Debug)]
struct MonotonicClock {
    last: Mutex<DateTime<Utc>>,
}

impl MonotonicClock {
    fn new() -> Self {
        Self {
            last: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    fn next(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap();
        let mut now = Utc::now();
        if now <= *last {
            now = *last + Duration::microseconds(1);
        }
        *last = now;
        now
    }
}

#[derive(Debug)]
pub struct MemoryEventStore {
    records: RwLock<Vec<Event>>,
    clock: MonotonicClock,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            clock: MonotonicClock::new(),
        }
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let mut events = self.records.read().unwrap().clone();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn insert(&self, draft: EventDraft) -> Result<Event, StoreError> {
        let now = self.clock.next();
        let event = Event {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            venue: draft.venue,
            category: draft.category,
            club: draft.club,
            image_url: draft.image_url,
            registration_open: draft.registration_open,
            registration_link: draft.registration_link,
            created_at: now,
            updated_at: now,
        };
        self.records.write().unwrap().push(event.clone());
        Ok(event)
    }

    async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event, StoreError> {
        let now = self.clock.next();
        let mut records = self.records.write().unwrap();
        let event = records
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(time) = patch.time {
            event.time = time;
        }
        if let Some(venue) = patch.venue {
            event.venue = venue;
        }
        if let Some(category) = patch.category {
            event.category = category;
        }
        if let Some(club) = patch.club {
            event.club = club;
        }
        if let Some(image_url) = patch.image_url {
            event.image_url = Some(image_url);
        }
        if let Some(open) = patch.registration_open {
            event.registration_open = open;
        }
        if let Some(link) = patch.registration_link {
            event.registration_link = Some(link);
        }
        event.updated_at = now;
        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.write().unwrap();
        let before = records.len();
        records.retain(|e| e.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct MemoryRegistrationStore {
    records: RwLock<Vec<Registration>>,
    clock: MonotonicClock,
}

impl MemoryRegistrationStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            clock: MonotonicClock::new(),
        }
    }
}

impl Default for MemoryRegistrationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn find(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Registration>, StoreError> {
        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .find(|r| r.event_id == event_id && r.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, event_id: Uuid, user_id: Uuid) -> Result<Registration, StoreError> {
        let registration = Registration {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            registered_at: self.clock.next(),
        };
        self.records.write().unwrap().push(registration.clone());
        Ok(registration)
    }

    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Registration>, StoreError> {
        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Registration>, StoreError> {
        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug)]
pub struct MemoryNoticeStore {
    records: RwLock<Vec<Notice>>,
    clock: MonotonicClock,
}

impl MemoryNoticeStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            clock: MonotonicClock::new(),
        }
    }
}

impl Default for MemoryNoticeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoticeStore for MemoryNoticeStore {
    async fn list(&self) -> Result<Vec<Notice>, StoreError> {
        let mut notices = self.records.read().unwrap().clone();
        notices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notices)
    }

    async fn insert(&self, draft: NoticeDraft) -> Result<Notice, StoreError> {
        let now = self.clock.next();
        let notice = Notice {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            category: draft.category,
            important: draft.important,
            created_at: now,
            updated_at: now,
        };
        self.records.write().unwrap().push(notice.clone());
        Ok(notice)
    }

    async fn update(&self, id: Uuid, draft: NoticeDraft) -> Result<Notice, StoreError> {
        let now = self.clock.next();
        let mut records = self.records.write().unwrap();
        let notice = records
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::NotFound)?;
        notice.title = draft.title;
        notice.content = draft.content;
        notice.category = draft.category;
        notice.important = draft.important;
        notice.updated_at = now;
        Ok(notice.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.write().unwrap();
        let before = records.len();
        records.retain(|n| n.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct MemoryProfileStore {
    records: RwLock<HashMap<Uuid, UserProfile>>,
    clock: MonotonicClock,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock: MonotonicClock::new(),
        }
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.records.read().unwrap().get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: Uuid, patch: ProfilePatch) -> Result<UserProfile, StoreError> {
        let now = self.clock.next();
        let mut records = self.records.write().unwrap();
        let profile = records.entry(user_id).or_insert_with(|| UserProfile {
            user_id,
            display_name: None,
            email: None,
            bio: None,
            phone: None,
            notifications: Default::default(),
            updated_at: now,
        });
        if let Some(display_name) = patch.display_name {
            profile.display_name = Some(display_name);
        }
        if let Some(email) = patch.email {
            profile.email = Some(email);
        }
        if let Some(bio) = patch.bio {
            profile.bio = Some(bio);
        }
        if let Some(phone) = patch.phone {
            profile.phone = Some(phone);
        }
        if let Some(notifications) = patch.notifications {
            profile.notifications = notifications;
        }
        profile.updated_at = now;
        Ok(profile.clone())
    }
}

#[derive(Debug)]
pub struct MemoryUserStore {
    records: RwLock<Vec<UserRecord>>,
    clock: MonotonicClock,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            clock: MonotonicClock::new(),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<UserRecord, StoreError> {
        let now = self.clock.next();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
            photo_url: None,
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.records.write().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_identity(
        &self,
        id: Uuid,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<UserRecord, StoreError> {
        let now = self.clock.next();
        let mut records = self.records.write().unwrap();
        let record = records
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(display_name) = display_name {
            record.display_name = Some(display_name.to_string());
        }
        if let Some(photo_url) = photo_url {
            record.photo_url = Some(photo_url.to_string());
        }
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let now = self.clock.next();
        let mut records = self.records.write().unwrap();
        let record = records
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        record.password_hash = password_hash.to_string();
        record.updated_at = now;
        Ok(())
    }
}
