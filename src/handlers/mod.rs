use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::success;

pub mod admin;
pub mod auth;
pub mod events;
pub mod notices;
pub mod profile;
pub mod registrations;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "quad-api",
    };

    success(payload, "Health check successful").into_response()
}
