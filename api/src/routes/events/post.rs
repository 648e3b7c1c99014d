use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::event::{EventDraft, EventService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::error_response;

/// POST /api/events
///
/// ### Request Body
/// ```json
/// {
///   "name": "Foundation Week",
///   "description": "Opening week activities",
///   "start_date": "2025-10-01T08:00:00Z",
///   "end_date": "2025-10-05T17:00:00Z",
///   "is_active": true
/// }
/// ```
///
/// ### Responses
/// - `201 Created`: the created event
/// - `400 Bad Request`: empty name, end before start
pub async fn create_event(State(state): State<AppState>, Json(body): Json<EventDraft>) -> Response {
    match EventService::create(state.db(), body).await {
        Ok(event) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(event, "Event created successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
