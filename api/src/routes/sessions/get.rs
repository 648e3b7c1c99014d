use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use services::session::SessionService;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::error_response;

/// GET /api/events/{event_id}/sessions
///
/// Sessions of the event ordered by time-in start.
pub async fn list_event_sessions(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Response {
    match SessionService::list_for_event(state.db(), event_id).await {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(sessions, "Sessions retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/sessions/{session_id}
///
/// Session with its event name, lifecycle (`upcoming`, `active`, `completed`)
/// and number of attendance records.
pub async fn get_session(State(state): State<AppState>, Path(session_id): Path<i64>) -> Response {
    match SessionService::detail(state.db(), session_id, Utc::now()).await {
        Ok(detail) => (
            StatusCode::OK,
            Json(ApiResponse::success(detail, "Session retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
