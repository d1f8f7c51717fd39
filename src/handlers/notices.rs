use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn list_notices(State(state): State<AppState>) -> Result<Response, AppError> {
    let notices = state.notices.list().await?;
    Ok(success(notices, "Notices retrieved").into_response())
}
