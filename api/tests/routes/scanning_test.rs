#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use db::models::{
        attendance_record::{Model as RecordModel, ScanMetadata},
        event::Model as EventModel,
        session::Model as SessionModel,
        student::Model as StudentModel,
    };
    use serde_json::json;
    use tower::ServiceExt;
    use util::state::AppState;

    use crate::helpers::{json_body, json_request, make_test_app};

    struct Ctx {
        /// Time-in window open right now.
        arrivals: SessionModel,
        /// Time-out window open right now.
        departures: SessionModel,
        student: StudentModel,
    }

    async fn setup(state: &AppState) -> Ctx {
        let db = state.db();
        let now = Utc::now();
        let event = EventModel::create(db, "Live Event", None, now - Duration::hours(3), now + Duration::hours(3), true)
            .await
            .unwrap();
        let arrivals = SessionModel::create(
            db,
            event.id,
            "Arrivals",
            None,
            (now - Duration::minutes(10), now + Duration::minutes(20)),
            Some((now + Duration::minutes(30), now + Duration::minutes(60))),
            true,
        )
        .await
        .unwrap();
        let departures = SessionModel::create(
            db,
            event.id,
            "Departures",
            None,
            (now - Duration::hours(2), now - Duration::hours(1)),
            Some((now - Duration::minutes(10), now + Duration::minutes(20))),
            true,
        )
        .await
        .unwrap();
        let student = StudentModel::create(db, "2023-0100", "Rin", "Ocampo", None, Some("BSEE"), Some(1))
            .await
            .unwrap();

        Ctx {
            arrivals,
            departures,
            student,
        }
    }

    fn scan(session_id: i64, qr: &str) -> Request<AxumBody> {
        let mut req = json_request(
            "POST",
            "/api/scanning/process",
            json!({ "session_id": session_id, "qr_data": qr, "scanned_by": "gate-1" }),
        );
        req.headers_mut()
            .insert("x-forwarded-for", "198.51.100.4".parse().unwrap());
        req
    }

    #[tokio::test]
    async fn time_in_scan_then_duplicate() {
        let (app, state) = make_test_app().await;
        let ctx = setup(&state).await;

        let response = app.clone().oneshot(scan(ctx.arrivals.id, "ST:2023-0100")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["message"], "Rin Ocampo checked in");
        assert_eq!(json["data"]["scan_type"], "time_in");
        assert_eq!(json["data"]["status"], "checked-in-only");
        assert_eq!(json["data"]["record"]["ip_address"], "198.51.100.4");
        assert_eq!(json["data"]["record"]["scanned_by"], "gate-1");

        let response = app.clone().oneshot(scan(ctx.arrivals.id, "2023-0100")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let recent = Request::builder()
            .method("GET")
            .uri(format!("/api/scanning/process?session_id={}", ctx.arrivals.id))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.oneshot(recent).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["scans"][0]["student_name"], "Rin Ocampo");
    }

    #[tokio::test]
    async fn time_out_requires_a_prior_time_in() {
        let (app, state) = make_test_app().await;
        let ctx = setup(&state).await;

        let response = app.clone().oneshot(scan(ctx.departures.id, "2023-0100")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        RecordModel::record_time_in(
            state.db(),
            ctx.student.id,
            ctx.departures.id,
            ctx.departures.event_id,
            ctx.departures.time_in_start + Duration::minutes(5),
            &ScanMetadata::default(),
        )
        .await
        .unwrap();

        let response = app.clone().oneshot(scan(ctx.departures.id, "2023-0100")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["scan_type"], "time_out");
        assert_eq!(json["data"]["status"], "present");

        let response = app.oneshot(scan(ctx.departures.id, "2023-0100")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn rejects_bad_payloads_and_unknown_rows() {
        let (app, state) = make_test_app().await;
        let ctx = setup(&state).await;

        let cases = [
            (scan(ctx.arrivals.id, "   "), StatusCode::BAD_REQUEST),
            (scan(ctx.arrivals.id, "bad id!"), StatusCode::BAD_REQUEST),
            (scan(ctx.arrivals.id, "ST:0000-0000"), StatusCode::NOT_FOUND),
            (scan(ctx.arrivals.id + 100, "2023-0100"), StatusCode::NOT_FOUND),
        ];
        for (req, expected) in cases {
            let response = app.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), expected);
            assert_eq!(json_body(response).await["success"], false);
        }
    }
}
