//! Route guards.
//!
//! `CurrentUser` resolves the bearer token against the auth service;
//! `AdminUser` additionally requires allow-list membership. Handlers take
//! these as arguments, so a protected route is protected by its signature.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::models::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppError;

#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

/// The raw bearer token, for handlers that manage the session itself
/// (sign-out, password change).
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[async_trait]
impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;
        Ok(BearerToken(token.to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;
        let user = state
            .auth
            .authenticate(token)
            .await?
            .ok_or_else(|| AppError::AuthError("Session expired".to_string()))?;
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !state.admins.is_admin(&user.email) {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}
