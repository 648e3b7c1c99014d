//! # Sessions Routes Module
//!
//! - `GET /sessions/{session_id}` → `get_session`
//! - `PUT /sessions/{session_id}` → `update_session`
//! - `DELETE /sessions/{session_id}` → `delete_session`
//!
//! `list_event_sessions` and `create_session` are mounted under `/events/{event_id}/sessions`.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

pub use delete::delete_session;
pub use get::{get_session, list_event_sessions};
pub use post::create_session;
pub use put::update_session;

pub fn sessions_routes() -> Router<AppState> {
    Router::new().route(
        "/{session_id}",
        get(get_session).put(update_session).delete(delete_session),
    )
}
