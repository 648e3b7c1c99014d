use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

pub use post::create_student;

/// - `POST /students` → `create_student`
pub fn students_routes() -> Router<AppState> {
    Router::new().route("/", post(create_student))
}
