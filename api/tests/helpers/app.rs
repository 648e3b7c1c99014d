use api::routes::routes;
use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use db::test_utils::setup_test_db;
use serde_json::Value;
use util::{config::AppConfig, state::AppState};

/// Router mounted under `/api` over a fresh in-memory database.
///
/// The returned state shares the router's connection so tests can seed rows directly.
pub async fn make_test_app() -> (Router, AppState) {
    let db = setup_test_db().await;
    let app_state = AppState::new(db, AppConfig::for_tests());

    let router = Router::new().nest("/api", routes(app_state.clone()));
    (router, app_state)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
