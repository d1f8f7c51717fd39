use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorBody,
}

fn envelope<T>(data: Option<T>, message: impl Into<String>) -> ApiResponse<T>
where
    T: Serialize,
{
    ApiResponse {
        success: true,
        data,
        message: Some(message.into()),
    }
}

pub fn success<T>(data: T, message: impl Into<String>) -> impl IntoResponse
where
    T: Serialize,
{
    (StatusCode::OK, Json(envelope(Some(data), message)))
}

/// Like [`success`] but 201, for freshly created records.
pub fn created<T>(data: T, message: impl Into<String>) -> impl IntoResponse
where
    T: Serialize,
{
    (StatusCode::CREATED, Json(envelope(Some(data), message)))
}

pub fn empty_success(message: impl Into<String>) -> impl IntoResponse {
    (StatusCode::OK, Json(envelope::<()>(None, message)))
}

pub fn error(
    code: &str,
    message: impl Into<String>,
    details: Option<Value>,
    status: StatusCode,
) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error: ApiErrorBody {
            code: code.to_string(),
            message: message.into(),
            details,
        },
    };

    (status, Json(body)).into_response()
}
