pub mod app;

pub use app::{json_body, json_request, make_test_app};
