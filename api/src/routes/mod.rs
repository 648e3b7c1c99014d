//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → readiness check (database ping)
//! - `/events` → events, their sessions, attendance listing and export, stats
//! - `/sessions` → single-session detail, edit, delete
//! - `/scanning` → QR scan processing and recent scans
//! - `/students` → student registration

use crate::routes::{
    events::events_routes, health::health_routes, scanning::scanning_routes,
    sessions::sessions_routes, students::students_routes,
};
use axum::Router;
use util::state::AppState;

pub mod attendance;
pub mod common;
pub mod events;
pub mod health;
pub mod scanning;
pub mod sessions;
pub mod students;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router is already bound to `app_state` and is meant to be
/// nested under `/api`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/events", events_routes())
        .nest("/sessions", sessions_routes())
        .nest("/scanning", scanning_routes())
        .nest("/students", students_routes())
        .with_state(app_state)
}
