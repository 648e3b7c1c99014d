use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use services::session::{SessionDraft, SessionError, SessionService};
use services::session_conflict::ConflictOutcome;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::session_error_response;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionQuery {
    #[serde(default, alias = "checkConflicts")]
    pub check_conflicts: bool,
}

/// POST /api/events/{event_id}/sessions
///
/// Creates a session. With `?check_conflicts=true` nothing is written: the
/// draft is validated and checked against the event's active sessions.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Morning Assembly",
///   "time_in_start": "2025-10-01T08:00:00Z",
///   "time_in_end": "2025-10-01T08:30:00Z",
///   "time_out_start": "2025-10-01T11:00:00Z",
///   "time_out_end": "2025-10-01T11:30:00Z"
/// }
/// ```
///
/// ### Responses
/// - `201 Created`: session created
/// - `200 OK`: dry run found no conflicts
/// - `400 Bad Request`: invalid name or windows
/// - `404 Not Found`: unknown event
/// - `409 Conflict`: `data` holds the names of the conflicting sessions
pub async fn create_session(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<CreateSessionQuery>,
    Json(body): Json<SessionDraft>,
) -> Response {
    if query.check_conflicts {
        return match SessionService::check(state.db(), event_id, &body).await {
            Ok(ConflictOutcome::Clear) => (
                StatusCode::OK,
                Json(ApiResponse::success(Vec::<String>::new(), "No conflicts found")),
            )
                .into_response(),
            Ok(ConflictOutcome::Conflict(names)) => {
                session_error_response(SessionError::Conflict(names))
            }
            Err(e) => session_error_response(e),
        };
    }

    match SessionService::create(state.db(), event_id, body).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(session, "Session created successfully")),
        )
            .into_response(),
        Err(e) => session_error_response(e),
    }
}
