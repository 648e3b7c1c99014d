//! Error-to-response mapping shared by the route groups.

use axum::{http::StatusCode, response::Response};
use services::attendance_report::ReportError;
use services::event::EventError;
use services::scan::ScanError;
use services::session::SessionError;
use services::student::StudentError;
use std::fmt::Display;

use crate::response::ApiResponse;

/// HTTP status for a service error.
pub trait ErrorStatus: Display {
    fn status(&self) -> StatusCode;
}

impl ErrorStatus for EventError {
    fn status(&self) -> StatusCode {
        match self {
            EventError::Invalid(_) => StatusCode::BAD_REQUEST,
            EventError::NotFound => StatusCode::NOT_FOUND,
            EventError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorStatus for SessionError {
    fn status(&self) -> StatusCode {
        match self {
            SessionError::Invalid(_) | SessionError::Window(_) => StatusCode::BAD_REQUEST,
            SessionError::Conflict(_) => StatusCode::CONFLICT,
            SessionError::EventNotFound | SessionError::NotFound => StatusCode::NOT_FOUND,
            SessionError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorStatus for ScanError {
    fn status(&self) -> StatusCode {
        match self {
            ScanError::InvalidQr(_) | ScanError::ScanNotAllowed(_) | ScanError::InvalidSequence => {
                StatusCode::BAD_REQUEST
            }
            ScanError::SessionNotFound | ScanError::StudentNotFound => StatusCode::NOT_FOUND,
            ScanError::AlreadyCheckedIn | ScanError::AlreadyCheckedOut => StatusCode::CONFLICT,
            ScanError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorStatus for StudentError {
    fn status(&self) -> StatusCode {
        match self {
            StudentError::Invalid(_) => StatusCode::BAD_REQUEST,
            StudentError::Duplicate(_) => StatusCode::CONFLICT,
            StudentError::NotFound => StatusCode::NOT_FOUND,
            StudentError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorStatus for ReportError {
    fn status(&self) -> StatusCode {
        match self {
            ReportError::EventNotFound => StatusCode::NOT_FOUND,
            ReportError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wraps `err` in an error envelope. Server errors are logged and their
/// details are not sent to the client.
pub fn error_response<E: ErrorStatus>(err: E) -> Response {
    let status = err.status();
    let message = if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
        "Internal server error".to_owned()
    } else {
        err.to_string()
    };
    ApiResponse::<()>::error(message).respond(status)
}

/// Like [`error_response`], but a conflict carries the conflicting session names as `data`.
pub fn session_error_response(err: SessionError) -> Response {
    match err {
        SessionError::Conflict(names) => {
            ApiResponse::error_with_data(names, "Time windows conflict with existing sessions")
                .respond(StatusCode::CONFLICT)
        }
        other => error_response(other),
    }
}
