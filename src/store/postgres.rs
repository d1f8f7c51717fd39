//! Postgres adapters. Timestamps are assigned by the database (`now()`),
//! never by the caller, so `created_at == updated_at` on insert and
//! `updated_at` advances on every merge-update.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    EventStore, NoticeStore, ProfileStore, RegistrationStore, StoreError, UserStore,
};
use crate::models::{
    Event, EventDraft, EventPatch, Notice, NoticeDraft, ProfilePatch, Registration, UserProfile,
    UserRecord,
};

#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn insert(&self, draft: EventDraft) -> Result<Event, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events \
             (title, description, date, time, venue, category, club, image_url, \
              registration_open, registration_link) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(draft.title)
        .bind(draft.description)
        .bind(draft.date)
        .bind(draft.time)
        .bind(draft.venue)
        .bind(draft.category)
        .bind(draft.club)
        .bind(draft.image_url)
        .bind(draft.registration_open)
        .bind(draft.registration_link)
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             date = COALESCE($4, date), \
             time = COALESCE($5, time), \
             venue = COALESCE($6, venue), \
             category = COALESCE($7, category), \
             club = COALESCE($8, club), \
             image_url = COALESCE($9, image_url), \
             registration_open = COALESCE($10, registration_open), \
             registration_link = COALESCE($11, registration_link), \
             updated_at = now() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.date)
        .bind(patch.time)
        .bind(patch.venue)
        .bind(patch.category)
        .bind(patch.club)
        .bind(patch.image_url)
        .bind(patch.registration_open)
        .bind(patch.registration_link)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;
        Ok(event)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PgRegistrationStore {
    pool: PgPool,
}

impl PgRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationStore for PgRegistrationStore {
    async fn find(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Registration>, StoreError> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(registration)
    }

    async fn insert(&self, event_id: Uuid, user_id: Uuid) -> Result<Registration, StoreError> {
        let registration = sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (event_id, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(registration)
    }

    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Registration>, StoreError> {
        let registrations = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 ORDER BY registered_at",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(registrations)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Registration>, StoreError> {
        let registrations = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE user_id = $1 ORDER BY registered_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(registrations)
    }
}

#[derive(Debug, Clone)]
pub struct PgNoticeStore {
    pool: PgPool,
}

impl PgNoticeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoticeStore for PgNoticeStore {
    async fn list(&self) -> Result<Vec<Notice>, StoreError> {
        let notices = sqlx::query_as::<_, Notice>(
            "SELECT * FROM notices ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(notices)
    }

    async fn insert(&self, draft: NoticeDraft) -> Result<Notice, StoreError> {
        let notice = sqlx::query_as::<_, Notice>(
            "INSERT INTO notices (title, content, category, important) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(draft.title)
        .bind(draft.content)
        .bind(draft.category)
        .bind(draft.important)
        .fetch_one(&self.pool)
        .await?;
        Ok(notice)
    }

    async fn update(&self, id: Uuid, draft: NoticeDraft) -> Result<Notice, StoreError> {
        let notice = sqlx::query_as::<_, Notice>(
            "UPDATE notices SET title = $2, content = $3, category = $4, important = $5, \
             updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(draft.title)
        .bind(draft.content)
        .bind(draft.category)
        .bind(draft.important)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;
        Ok(notice)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT * FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn upsert(&self, user_id: Uuid, patch: ProfilePatch) -> Result<UserProfile, StoreError> {
        let (event_updates, new_notices, registration_confirmations) = match patch.notifications {
            Some(n) => (
                Some(n.event_updates),
                Some(n.new_notices),
                Some(n.registration_confirmations),
            ),
            None => (None, None, None),
        };
        let profile = sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles \
             (user_id, display_name, email, bio, phone, event_updates, new_notices, \
              registration_confirmations) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE), COALESCE($7, TRUE), \
                     COALESCE($8, TRUE)) \
             ON CONFLICT (user_id) DO UPDATE SET \
             display_name = COALESCE($2, user_profiles.display_name), \
             email = COALESCE($3, user_profiles.email), \
             bio = COALESCE($4, user_profiles.bio), \
             phone = COALESCE($5, user_profiles.phone), \
             event_updates = COALESCE($6, user_profiles.event_updates), \
             new_notices = COALESCE($7, user_profiles.new_notices), \
             registration_confirmations = COALESCE($8, user_profiles.registration_confirmations), \
             updated_at = now() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(patch.display_name)
        .bind(patch.email)
        .bind(patch.bio)
        .bind(patch.phone)
        .bind(event_updates)
        .bind(new_notices)
        .bind(registration_confirmations)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<UserRecord, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (email, password_hash, display_name) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_identity(
        &self,
        id: Uuid,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<UserRecord, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            "UPDATE users SET \
             display_name = COALESCE($2, display_name), \
             photo_url = COALESCE($3, photo_url), \
             updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(display_name)
        .bind(photo_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
