use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::session::{SessionPatch, SessionService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::session_error_response;

/// PUT /api/sessions/{session_id}
///
/// Partial update. Omitted fields keep their value; `"clear_time_out": true`
/// removes the time-out window. The merged windows are re-validated and
/// checked against the event's other active sessions.
///
/// ### Responses
/// - `200 OK`: updated session
/// - `400 Bad Request`: invalid name or windows
/// - `404 Not Found`: unknown session
/// - `409 Conflict`: `data` holds the names of the conflicting sessions
pub async fn update_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Json(body): Json<SessionPatch>,
) -> Response {
    match SessionService::update(state.db(), session_id, body).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(session, "Session updated successfully")),
        )
            .into_response(),
        Err(e) => session_error_response(e),
    }
}
