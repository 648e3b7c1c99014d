use crate::response::ApiResponse;
use axum::{Router, extract::State, http::StatusCode, response::Response, routing::get};
use serde::Serialize;
use util::state::AppState;

/// Builds the `/health` route group.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub database: &'static str,
    pub environment: String,
}

/// GET /api/health
///
/// Readiness check: pings the attendance database.
///
/// - `200 OK`: `data.database` is `"reachable"`
/// - `503 Service Unavailable`: the database did not answer the ping
async fn health_check(State(state): State<AppState>) -> Response {
    let environment = state.config().env.clone();

    match state.db().ping().await {
        Ok(()) => ApiResponse::success(
            HealthReport {
                database: "reachable",
                environment,
            },
            "Attendance service is ready",
        )
        .respond(StatusCode::OK),
        Err(err) => {
            tracing::warn!(%err, "health check: database ping failed");
            ApiResponse::error_with_data(
                HealthReport {
                    database: "unreachable",
                    environment,
                },
                "Database unavailable",
            )
            .respond(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
