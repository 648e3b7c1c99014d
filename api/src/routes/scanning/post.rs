use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::attendance_record::{ScanMetadata, ScanType};
use serde::Deserialize;
use services::scan::{ScanRequest, ScanService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::error_response;

#[derive(Debug, Deserialize)]
pub struct ProcessScanBody {
    pub session_id: i64,
    pub qr_data: String,
    pub scanned_by: Option<String>,
}

/// First address in `X-Forwarded-For`, else `X-Real-IP`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_owned)
}

/// POST /api/scanning/process
///
/// ### Request Body
/// ```json
/// { "session_id": 3, "qr_data": "ST:2023-0100", "scanned_by": "organizer-1" }
/// ```
///
/// ### Responses
/// - `200 OK`: time-in or time-out recorded; `data` carries the record,
///   the student and the derived status
/// - `400 Bad Request`: bad QR payload, outside the scan windows,
///   inactive session, time-out before time-in
/// - `404 Not Found`: unknown session or student
/// - `409 Conflict`: already checked in / out
pub async fn process_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ProcessScanBody>,
) -> Response {
    let meta = ScanMetadata {
        scanned_by: body.scanned_by,
        ip_address: client_ip(&headers),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    };
    let request = ScanRequest {
        session_id: body.session_id,
        qr_data: body.qr_data,
    };

    match ScanService::process(state.db(), &request, meta, Utc::now()).await {
        Ok(outcome) => {
            let message = match outcome.scan_type {
                ScanType::TimeIn => format!("{} checked in", outcome.student.name),
                ScanType::TimeOut => format!("{} checked out", outcome.student.name),
            };
            (StatusCode::OK, Json(ApiResponse::success(outcome, message))).into_response()
        }
        Err(e) => error_response(e),
    }
}
