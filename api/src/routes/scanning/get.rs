use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use services::scan::ScanService;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::error_response;

#[derive(Debug, Deserialize)]
pub struct RecentScansQuery {
    pub session_id: i64,
    pub limit: Option<u64>,
}

/// GET /api/scanning/process?session_id={id}&limit={n}
///
/// Latest scans of a session (default 10) and the session's total record count.
pub async fn recent_scans(
    State(state): State<AppState>,
    Query(query): Query<RecentScansQuery>,
) -> Response {
    match ScanService::recent(state.db(), query.session_id, query.limit).await {
        Ok(recent) => (
            StatusCode::OK,
            Json(ApiResponse::success(recent, "Recent scans retrieved")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
