//! # Scanning Routes Module
//!
//! - `POST /scanning/process` → `process_scan`
//! - `GET /scanning/process?session_id=` → `recent_scans`

use axum::{Router, routing::post};
use util::state::AppState;

pub mod get;
pub mod post;

pub use get::recent_scans;
pub use post::process_scan;

pub fn scanning_routes() -> Router<AppState> {
    Router::new().route("/process", post(process_scan).get(recent_scans))
}
