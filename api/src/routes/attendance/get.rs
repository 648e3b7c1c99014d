use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use services::attendance_report::{AttendanceQuery, AttendanceReport};
use services::export::{attendance_csv, export_filename};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::error_response;

/// GET /api/events/{event_id}/attendance
///
/// ### Query Parameters
/// - `sessions` / `session_ids`: comma-separated session ids
/// - `status` / `statuses`: comma-separated labels (`present`, `late`,
///   `checked-in-only`, `absent`; `checked-in` and `checked-out` also accepted)
/// - `q`: case-insensitive match on name, email or student id number
/// - `years`, `scan_types`: comma-separated
/// - `sort`: `name` (default), `status`, `check_in_at`
/// - `order`: `asc` (default), `desc`
/// - `page` (default 1), `page_size` (default 50, max 100)
///
/// KPIs cover the whole event and ignore the filters.
pub async fn get_attendance(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<AttendanceQuery>,
) -> Response {
    match AttendanceReport::build(state.db(), event_id, &query).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(report, "Attendance retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/events/{event_id}/attendance/export
///
/// Same filters and sort as the listing, without pagination. Responds with a
/// `text/csv` attachment named after the event.
pub async fn export_attendance(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<AttendanceQuery>,
) -> Response {
    let (event, rows) = match AttendanceReport::export_rows(state.db(), event_id, &query).await {
        Ok(found) => found,
        Err(e) => return error_response(e),
    };

    let csv = attendance_csv(&rows);
    let filename = export_filename(&event.name);
    tracing::info!(event_id, rows = rows.len(), %filename, "Attendance exported");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .unwrap_or(HeaderValue::from_static("attachment")),
    );

    (StatusCode::OK, headers, csv).into_response()
}
