use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::event::{EventError, EventService, EventStats};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::error_response;

/// GET /api/events
///
/// All events, most recent start date first.
pub async fn list_events(State(state): State<AppState>) -> Response {
    match EventService::list(state.db()).await {
        Ok(events) => (
            StatusCode::OK,
            Json(ApiResponse::success(events, "Events retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/events/{event_id}
///
/// ### Errors
/// - `404 Not Found`: unknown event
pub async fn get_event(State(state): State<AppState>, Path(event_id): Path<i64>) -> Response {
    match EventService::find(state.db(), event_id).await {
        Ok(event) => (
            StatusCode::OK,
            Json(ApiResponse::success(event, "Event retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/events/stats
pub async fn event_stats(State(state): State<AppState>) -> Response {
    match EventStats::collect(state.db()).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Event statistics retrieved")),
        )
            .into_response(),
        Err(e) => error_response(EventError::Db(e)),
    }
}
