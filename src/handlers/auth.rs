use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::extract::BearerToken;
use crate::auth::CurrentUser;
use crate::models::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
struct SessionPayload {
    token: String,
    user: AuthUser,
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Response, AppError> {
    let signed = state
        .auth
        .sign_up(
            &request.email,
            &request.password,
            request.display_name.as_deref(),
        )
        .await?;
    let payload = SessionPayload {
        token: signed.token,
        user: signed.user,
    };
    Ok(created(payload, "Account created").into_response())
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Response, AppError> {
    let signed = state.auth.sign_in(&request.email, &request.password).await?;
    let payload = SessionPayload {
        token: signed.token,
        user: signed.user,
    };
    Ok(success(payload, "Signed in").into_response())
}

pub async fn sign_out(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Response, AppError> {
    state.auth.sign_out(&token).await;
    Ok(empty_success("Signed out").into_response())
}

pub async fn me(CurrentUser(user): CurrentUser) -> Response {
    success(user, "Current user").into_response()
}

pub async fn change_password(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Response, AppError> {
    state
        .auth
        .change_password(&token, &request.current_password, &request.new_password)
        .await?;
    Ok(empty_success("Password updated").into_response())
}
