//! JSON envelope shared by every route.
//!
//! `{ "success": bool, "data": T, "message": string }`. Errors without a
//! payload serialize `data` as `null`; session conflicts put the conflicting
//! session names in `data`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Failure with an empty (`Default`) payload.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self::error_with_data(T::default(), message)
    }

    pub fn error_with_data(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
        }
    }

    /// Serializes the envelope with the given status code.
    pub fn respond(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
