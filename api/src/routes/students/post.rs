use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::student::{StudentDraft, StudentService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::error_response;

/// POST /api/students
///
/// ### Request Body
/// ```json
/// {
///   "student_id_number": "2023-0100",
///   "first_name": "Rin",
///   "last_name": "Ocampo",
///   "email": "rin@campus.edu",
///   "program": "BSEE",
///   "year": 1
/// }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request`: invalid id number, names or email
/// - `409 Conflict`: id number already registered
pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<StudentDraft>,
) -> Response {
    match StudentService::create(state.db(), body).await {
        Ok(student) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(student, "Student registered successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
