use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use uuid::Uuid;

use crate::auth::{AdminUser, CurrentUser};
use crate::registration::RegistrationOutcome;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn register(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    match state.registrations.register(event_id, user.id).await? {
        RegistrationOutcome::Registered(registration) => {
            Ok(created(registration, "Registered for event").into_response())
        }
        // Externally hosted registration: hand the caller over, change nothing.
        RegistrationOutcome::ExternalLink(link) => {
            Ok(Redirect::temporary(&link).into_response())
        }
    }
}

pub async fn my_registrations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let registrations = state.registrations.registrations_for_user(user.id).await?;
    Ok(success(registrations, "Registrations retrieved").into_response())
}

pub async fn event_registrations(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let registrations = state
        .registrations
        .registrations_for_event(event_id)
        .await?;
    Ok(success(registrations, "Registrations retrieved").into_response())
}
