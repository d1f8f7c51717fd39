//! The event editor.
//!
//! One state machine serves both creation and mutation; the mode is fixed
//! when the editor is constructed and never inferred from field presence.
//! Submission is: optional image upload, then a single upsert through the
//! feed. An upload failure aborts before the upsert and keeps both the
//! draft and the selected file for retry. An upsert failure keeps the
//! draft, but a completed upload is not rolled back: the draft then
//! carries the new reference and a retry will not upload again.

use thiserror::Error;
use uuid::Uuid;

use crate::assets::{AssetError, AssetStore};
use crate::events::feed::EventFeed;
use crate::models::{Event, EventDraft, EventPatch};
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(Uuid),
}

/// A file selected for upload, held until submission.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("image upload failed")]
    Upload(#[from] AssetError),
    #[error("could not save event")]
    Save(#[from] StoreError),
}

#[derive(Debug)]
pub struct EventEditor {
    mode: EditorMode,
    draft: EventDraft,
    image: Option<PendingUpload>,
}

impl EventEditor {
    /// Create mode: empty identifier, caller-supplied draft.
    pub fn create(draft: EventDraft) -> Self {
        Self {
            mode: EditorMode::Create,
            draft,
            image: None,
        }
    }

    /// Edit mode: identifier fixed, draft pre-populated from the record.
    pub fn edit(event: &Event) -> Self {
        Self {
            mode: EditorMode::Edit(event.id),
            draft: EventDraft::from_event(event),
            image: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    /// Field edits mutate only the local draft.
    pub fn set_draft(&mut self, draft: EventDraft) {
        self.draft = draft;
    }

    pub fn attach_image(&mut self, upload: PendingUpload) {
        self.image = Some(upload);
    }

    pub fn has_pending_image(&self) -> bool {
        self.image.is_some()
    }

    /// Upload-then-upsert. On success the stored record is returned; the
    /// caller closes the editor. On failure the editor stays usable.
    pub async fn submit(
        &mut self,
        assets: &dyn AssetStore,
        feed: &EventFeed,
    ) -> Result<Event, EditorError> {
        if let Some(upload) = &self.image {
            let url = assets.upload(&upload.filename, &upload.bytes).await?;
            // Replaces whatever reference the draft carried before.
            self.draft.image_url = Some(url);
            self.image = None;
        }

        let event = match self.mode {
            EditorMode::Create => feed.create(self.draft.clone()).await?,
            EditorMode::Edit(id) => feed.update(id, EventPatch::from(self.draft.clone())).await?,
        };
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Club, EventCategory};
    use crate::store::MemoryEventStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct FixedUrlAssets;

    #[async_trait]
    impl AssetStore for FixedUrlAssets {
        async fn upload(&self, filename: &str, _bytes: &[u8]) -> Result<String, AssetError> {
            Ok(format!("http://assets.test/{filename}"))
        }
    }

    struct BrokenAssets;

    #[async_trait]
    impl AssetStore for BrokenAssets {
        async fn upload(&self, _filename: &str, _bytes: &[u8]) -> Result<String, AssetError> {
            Err(AssetError::Upload(std::io::Error::new(
                std::io::ErrorKind::Other,
                "host unreachable",
            )))
        }
    }

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: "A day of talks".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
            time: "09:00 AM - 05:00 PM".to_string(),
            venue: "Main Auditorium".to_string(),
            category: EventCategory::Technical,
            club: Club::TechWiz,
            image_url: None,
            registration_open: true,
            registration_link: None,
        }
    }

    async fn feed() -> EventFeed {
        EventFeed::new(Arc::new(MemoryEventStore::new())).await.unwrap()
    }

    #[tokio::test]
    async fn create_round_trip_preserves_every_draft_field() {
        let feed = feed().await;
        let submitted = draft("Tech Summit");

        let mut editor = EventEditor::create(submitted.clone());
        let event = editor.submit(&FixedUrlAssets, &feed).await.unwrap();

        let stored = feed.get(event.id).await.unwrap().unwrap();
        assert_eq!(EventDraft::from_event(&stored), submitted);
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn edit_round_trip_changes_only_the_edited_field() {
        let feed = feed().await;
        let mut editor = EventEditor::create(draft("Hackathon"));
        let original = editor.submit(&FixedUrlAssets, &feed).await.unwrap();

        let mut editor = EventEditor::edit(&original);
        assert_eq!(editor.mode(), EditorMode::Edit(original.id));
        assert_eq!(editor.draft(), &EventDraft::from_event(&original));

        let mut changed = editor.draft().clone();
        changed.venue = "Open Air Theatre".to_string();
        editor.set_draft(changed);
        let updated = editor.submit(&FixedUrlAssets, &feed).await.unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.venue, "Open Air Theatre");
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.date, original.date);
        assert_eq!(updated.time, original.time);
        assert_eq!(updated.category, original.category);
        assert_eq!(updated.club, original.club);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at > original.updated_at);
    }

    #[tokio::test]
    async fn upload_failure_aborts_submission_and_keeps_draft_and_file() {
        let feed = feed().await;
        let submitted = draft("Cultural Night");

        let mut editor = EventEditor::create(submitted.clone());
        editor.attach_image(PendingUpload {
            filename: "poster.png".to_string(),
            bytes: vec![1, 2, 3],
        });

        let err = editor.submit(&BrokenAssets, &feed).await.unwrap_err();
        assert!(matches!(err, EditorError::Upload(_)));

        // Nothing was upserted, the draft is intact, the file is still
        // selected for a retry.
        assert!(feed.list().await.unwrap().is_empty());
        assert_eq!(editor.draft(), &submitted);
        assert!(editor.has_pending_image());

        // Retry against a working host succeeds with the uploaded image.
        let event = editor.submit(&FixedUrlAssets, &feed).await.unwrap();
        assert_eq!(
            event.image_url.as_deref(),
            Some("http://assets.test/poster.png")
        );
    }

    #[tokio::test]
    async fn new_upload_replaces_previous_image_reference() {
        let feed = feed().await;
        let mut first = draft("Sports Meet");
        first.image_url = Some("http://assets.test/old.png".to_string());

        let mut editor = EventEditor::create(first);
        let event = editor.submit(&FixedUrlAssets, &feed).await.unwrap();
        assert_eq!(event.image_url.as_deref(), Some("http://assets.test/old.png"));

        let mut editor = EventEditor::edit(&event);
        editor.attach_image(PendingUpload {
            filename: "new.png".to_string(),
            bytes: vec![9],
        });
        let updated = editor.submit(&FixedUrlAssets, &feed).await.unwrap();
        assert_eq!(updated.image_url.as_deref(), Some("http://assets.test/new.png"));
    }

    #[tokio::test]
    async fn upsert_failure_keeps_draft_but_not_the_completed_upload() {
        let feed = feed().await;
        let mut editor = EventEditor::create(draft("Orphan"));
        let event = editor.submit(&FixedUrlAssets, &feed).await.unwrap();

        let mut editor = EventEditor::edit(&event);
        editor.attach_image(PendingUpload {
            filename: "late.png".to_string(),
            bytes: vec![4],
        });
        feed.delete(event.id).await.unwrap();

        let err = editor.submit(&FixedUrlAssets, &feed).await.unwrap_err();
        assert!(matches!(err, EditorError::Save(StoreError::NotFound)));

        // The upload completed and is not rolled back: the draft now carries
        // the new reference and no file is pending.
        assert_eq!(
            editor.draft().image_url.as_deref(),
            Some("http://assets.test/late.png")
        );
        assert!(!editor.has_pending_image());
    }
}
