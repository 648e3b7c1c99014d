//! # Events Routes Module
//!
//! - `get.rs`: list events, single event, stats
//! - `post.rs`: create event
//!
//! Event-scoped session and attendance handlers live in
//! [`crate::routes::sessions`] and [`crate::routes::attendance`] and are mounted here.

use axum::{Router, routing::get};
use get::{event_stats, get_event, list_events};
use post::create_event;
use util::state::AppState;

use crate::routes::attendance::{export_attendance, get_attendance};
use crate::routes::sessions::{create_session, list_event_sessions};

pub mod get;
pub mod post;

/// Builds the `/events` route group.
///
/// - `GET /events` → `list_events`
/// - `POST /events` → `create_event`
/// - `GET /events/stats` → `event_stats`
/// - `GET /events/{event_id}` → `get_event`
/// - `GET /events/{event_id}/sessions` → `list_event_sessions`
/// - `POST /events/{event_id}/sessions` → `create_session`
/// - `GET /events/{event_id}/attendance` → `get_attendance`
/// - `GET /events/{event_id}/attendance/export` → `export_attendance`
pub fn events_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/stats", get(event_stats))
        .route("/{event_id}", get(get_event))
        .route(
            "/{event_id}/sessions",
            get(list_event_sessions).post(create_session),
        )
        .route("/{event_id}/attendance", get(get_attendance))
        .route("/{event_id}/attendance/export", get(export_attendance))
}
