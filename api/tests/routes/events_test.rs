#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, TimeZone, Utc};
    use db::models::{event::Model as EventModel, session::Model as SessionModel};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::helpers::{json_body, json_request, make_test_app};

    fn get(uri: &str) -> Request<AxumBody> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(AxumBody::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn create_then_fetch_event() {
        let (app, _) = make_test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/events",
                json!({
                    "name": "Foundation Week",
                    "description": "Opening week",
                    "start_date": "2025-10-01T08:00:00Z",
                    "end_date": "2025-10-05T17:00:00Z"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["name"], "Foundation Week");
        assert_eq!(json["data"]["is_active"], true);
        let id = json["data"]["id"].as_i64().unwrap();

        let response = app.clone().oneshot(get(&format!("/api/events/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"]["description"], "Opening week");

        let response = app.clone().oneshot(get("/api/events")).await.unwrap();
        assert_eq!(json_body(response).await["data"].as_array().unwrap().len(), 1);

        let response = app.oneshot(get("/api/events/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Event not found");
    }

    #[tokio::test]
    async fn create_event_rejects_reversed_dates() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/events",
                json!({
                    "name": "Backwards",
                    "start_date": "2025-10-05T08:00:00Z",
                    "end_date": "2025-10-01T08:00:00Z"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_counts_events_and_sessions() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let day = Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap();

        let a = EventModel::create(db, "A", None, day, day, true).await.unwrap();
        EventModel::create(db, "B", None, day, day, false).await.unwrap();
        SessionModel::create(db, a.id, "S", None, (day, day + Duration::hours(1)), None, true)
            .await
            .unwrap();

        let response = app.oneshot(get("/api/events/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let data = &json_body(response).await["data"];
        assert_eq!(data["total_events"], 2);
        assert_eq!(data["active_events"], 1);
        assert_eq!(data["inactive_events"], 1);
        assert_eq!(data["total_sessions"], 1);
        assert_eq!(data["events_with_sessions"], 1);
        assert_eq!(data["events_without_attendance"], 2);
    }
}
