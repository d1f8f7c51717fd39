use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::auth::CurrentUser;
use crate::models::{NotificationPreferences, ProfilePatch};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let profile = state.profiles.get(user.id).await?;
    Ok(success(profile, "Profile retrieved").into_response())
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Response, AppError> {
    // The display name also lives on the auth identity; keep both in step.
    if request.display_name.is_some() {
        state
            .auth
            .update_identity(user.id, request.display_name.as_deref(), None)
            .await
            .map_err(|err| {
                error!(error = ?err, "failed to update auth identity");
                AppError::InternalServerError("Failed to update profile".to_string())
            })?;
    }

    let patch = ProfilePatch {
        display_name: request.display_name,
        email: Some(user.email),
        bio: request.bio,
        phone: request.phone,
        notifications: None,
    };
    let profile = state
        .profiles
        .upsert(user.id, patch)
        .await
        .map_err(|err| {
            error!(error = ?err, "failed to upsert profile");
            AppError::InternalServerError("Failed to update profile".to_string())
        })?;
    Ok(success(profile, "Profile updated successfully").into_response())
}

pub async fn update_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(preferences): Json<NotificationPreferences>,
) -> Result<Response, AppError> {
    let patch = ProfilePatch {
        notifications: Some(preferences),
        ..Default::default()
    };
    let profile = state
        .profiles
        .upsert(user.id, patch)
        .await
        .map_err(|err| {
            error!(error = ?err, "failed to update notification settings");
            AppError::InternalServerError("Failed to update profile".to_string())
        })?;
    Ok(success(profile, "Notification settings updated").into_response())
}

pub async fn upload_photo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Malformed multipart request: {e}")))?
    {
        if field.name() == Some("photo") {
            let filename = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| "photo".to_string());
            let bytes = field.bytes().await.map_err(|e| {
                AppError::ValidationError(format!("Unreadable photo upload: {e}"))
            })?;
            upload = Some((filename, bytes.to_vec()));
        }
    }
    let (filename, bytes) =
        upload.ok_or_else(|| AppError::ValidationError("Missing 'photo' form part".to_string()))?;

    let url = state.assets.upload(&filename, &bytes).await?;
    let updated = state
        .auth
        .update_identity(user.id, None, Some(&url))
        .await
        .map_err(|err| {
            error!(error = ?err, "failed to attach profile photo");
            AppError::InternalServerError("Failed to update profile photo".to_string())
        })?;
    Ok(success(updated, "Profile photo updated successfully").into_response())
}
