//! Admin-only handlers. Every handler here takes [`AdminUser`], so the
//! allow-list check is part of the route signature.

use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::events::{DashboardSummary, EventEditor, PendingUpload};
use crate::models::{EventDraft, NoticeDraft};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// The event form arrives as multipart: an `event` JSON part with the draft
/// fields, plus an optional `image` file part.
async fn parse_event_form(
    multipart: &mut Multipart,
) -> Result<(Option<EventDraft>, Option<PendingUpload>), AppError> {
    let mut draft = None;
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Malformed multipart request: {e}")))?
    {
        match field.name() {
            Some("event") => {
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::ValidationError(format!("Unreadable event payload: {e}"))
                })?;
                draft = Some(serde_json::from_slice::<EventDraft>(&bytes).map_err(|e| {
                    AppError::ValidationError(format!("Invalid event payload: {e}"))
                })?);
            }
            Some("image") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "upload".to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::ValidationError(format!("Unreadable image upload: {e}"))
                })?;
                image = Some(PendingUpload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }
    Ok((draft, image))
}

pub async fn create_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (draft, image) = parse_event_form(&mut multipart).await?;
    let draft = draft
        .ok_or_else(|| AppError::ValidationError("Missing 'event' form part".to_string()))?;

    let mut editor = EventEditor::create(draft);
    if let Some(image) = image {
        editor.attach_image(image);
    }
    let event = editor.submit(state.assets.as_ref(), &state.events).await?;
    Ok(created(event, "Event created").into_response())
}

pub async fn update_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let existing = state
        .events
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{id}' was not found")))?;

    let (draft, image) = parse_event_form(&mut multipart).await?;
    let mut editor = EventEditor::edit(&existing);
    if let Some(draft) = draft {
        editor.set_draft(draft);
    }
    if let Some(image) = image {
        editor.attach_image(image);
    }
    let event = editor.submit(state.assets.as_ref(), &state.events).await?;
    Ok(success(event, "Event updated").into_response())
}

pub async fn delete_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    state.events.delete(id).await?;
    Ok(empty_success("Event deleted").into_response())
}

pub async fn dashboard(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Response, AppError> {
    let events = state.events.list().await?;
    let summary = DashboardSummary::build(events, Utc::now().date_naive());
    Ok(success(summary, "Dashboard retrieved").into_response())
}

pub async fn create_notice(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    axum::Json(draft): axum::Json<NoticeDraft>,
) -> Result<Response, AppError> {
    let notice = state.notices.insert(draft).await?;
    Ok(created(notice, "Notice created").into_response())
}

pub async fn update_notice(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    axum::Json(draft): axum::Json<NoticeDraft>,
) -> Result<Response, AppError> {
    let notice = state.notices.update(id, draft).await?;
    Ok(success(notice, "Notice updated").into_response())
}

pub async fn delete_notice(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    state.notices.delete(id).await?;
    Ok(empty_success("Notice deleted").into_response())
}
