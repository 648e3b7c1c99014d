use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::session::SessionService;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::error_response;

/// DELETE /api/sessions/{session_id}
///
/// Removes the session and, by cascade, its attendance records.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Response {
    match SessionService::delete(state.db(), session_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Session deleted successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
