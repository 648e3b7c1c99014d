#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use chrono::{TimeZone, Utc};
    use db::models::{event::Model as EventModel, session::Model as SessionModel};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use util::state::AppState;

    use crate::helpers::{json_body, json_request, make_test_app};

    async fn seed_event(state: &AppState) -> i64 {
        let day = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        EventModel::create(state.db(), "Org Fair", None, day, day, true)
            .await
            .unwrap()
            .id
    }

    fn draft(name: &str, tin: (&str, &str), tout: Option<(&str, &str)>) -> Value {
        let mut body = json!({
            "name": name,
            "time_in_start": format!("2025-10-01T{}:00Z", tin.0),
            "time_in_end": format!("2025-10-01T{}:00Z", tin.1),
        });
        if let Some((start, end)) = tout {
            body["time_out_start"] = json!(format!("2025-10-01T{start}:00Z"));
            body["time_out_end"] = json!(format!("2025-10-01T{end}:00Z"));
        }
        body
    }

    #[tokio::test]
    async fn create_reports_conflicts_with_names() {
        let (app, state) = make_test_app().await;
        let event_id = seed_event(&state).await;
        let uri = format!("/api/events/{event_id}/sessions");

        let response = app
            .clone()
            .oneshot(json_request("POST", &uri, draft("Session A", ("10:00", "11:00"), None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request("POST", &uri, draft("Session B", ("10:30", "11:30"), None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], json!(["Session A"]));
        assert_eq!(json["message"], "Time windows conflict with existing sessions");

        let response = app
            .clone()
            .oneshot(json_request("POST", &uri, draft("Session C", ("11:00", "12:00"), None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let list = Request::builder()
            .method("GET")
            .uri(&uri)
            .body(AxumBody::empty())
            .unwrap();
        let json = json_body(app.oneshot(list).await.unwrap()).await;
        let names: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Session A", "Session C"]);
    }

    #[tokio::test]
    async fn dry_run_does_not_write() {
        let (app, state) = make_test_app().await;
        let event_id = seed_event(&state).await;
        let dry = format!("/api/events/{event_id}/sessions?check_conflicts=true");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &dry,
                draft("Probe", ("09:00", "10:00"), Some(("10:05", "11:00"))),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"], json!([]));
        assert!(SessionModel::list_for_event(state.db(), event_id).await.unwrap().is_empty());

        SessionModel::create(
            state.db(),
            event_id,
            "Existing",
            None,
            (
                Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 10, 1, 10, 0, 0).unwrap(),
            ),
            None,
            true,
        )
        .await
        .unwrap();

        // time-out window of the candidate hits the existing time-in window
        let response = app
            .oneshot(json_request(
                "POST",
                &dry,
                draft("Probe", ("07:00", "08:00"), Some(("09:30", "10:30"))),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["data"], json!(["Existing"]));
    }

    #[tokio::test]
    async fn invalid_windows_and_unknown_event() {
        let (app, state) = make_test_app().await;
        let event_id = seed_event(&state).await;
        let uri = format!("/api/events/{event_id}/sessions");

        for body in [
            draft("Too short", ("09:00", "09:10"), None),
            draft("Backwards", ("10:00", "09:00"), None),
            draft("Tight gap", ("09:00", "10:00"), Some(("10:02", "11:00"))),
            draft("", ("09:00", "10:00"), None),
        ] {
            let response = app
                .clone()
                .oneshot(json_request("POST", &uri, body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/events/4242/sessions",
                draft("Nowhere", ("09:00", "10:00"), None),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_detail_and_delete() {
        let (app, state) = make_test_app().await;
        let event_id = seed_event(&state).await;

        let created = json_body(
            app.clone()
                .oneshot(json_request(
                    "POST",
                    &format!("/api/events/{event_id}/sessions"),
                    draft("Talk", ("09:00", "10:00"), None),
                ))
                .await
                .unwrap(),
        )
        .await;
        let id = created["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/sessions/{id}");

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &uri,
                json!({
                    "name": "Keynote",
                    "time_out_start": "2025-10-01T10:30:00Z",
                    "time_out_end": "2025-10-01T11:00:00Z"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["name"], "Keynote");
        assert_eq!(json["data"]["time_out_end"], "2025-10-01T11:00:00Z");

        let detail = Request::builder()
            .method("GET")
            .uri(&uri)
            .body(AxumBody::empty())
            .unwrap();
        let response = app.clone().oneshot(detail).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["event_name"], "Org Fair");
        assert_eq!(json["data"]["lifecycle"], "completed");
        assert_eq!(json["data"]["attendance_count"], 0);

        let delete = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(AxumBody::empty())
            .unwrap();
        assert_eq!(app.clone().oneshot(delete).await.unwrap().status(), StatusCode::OK);

        let again = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(AxumBody::empty())
            .unwrap();
        assert_eq!(app.oneshot(again).await.unwrap().status(), StatusCode::NOT_FOUND);
    }
}
