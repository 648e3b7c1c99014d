#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use db::models::{
        attendance_record::{Model as RecordModel, ScanMetadata},
        event::Model as EventModel,
        session::Model as SessionModel,
        student::Model as StudentModel,
    };
    use tower::ServiceExt;
    use util::state::AppState;

    use crate::helpers::{json_body, make_test_app};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, h, m, 0).unwrap()
    }

    fn get(uri: &str) -> Request<AxumBody> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(AxumBody::empty())
            .unwrap()
    }

    /// Two students in one session: Ana present, Ben late and still checked in.
    async fn seed(state: &AppState) -> i64 {
        let db = state.db();
        let event = EventModel::create(db, "CCS Week: Day 1!", None, at(0, 0), at(23, 0), true)
            .await
            .unwrap();
        let session = SessionModel::create(
            db,
            event.id,
            "Opening",
            None,
            (at(9, 0), at(10, 0)),
            Some((at(11, 0), at(12, 0))),
            true,
        )
        .await
        .unwrap();
        let ana = StudentModel::create(db, "A-1", "Ana", "Lim", Some("ana@uni.edu"), None, None)
            .await
            .unwrap();
        let ben = StudentModel::create(db, "B-2", "Ben", "Go, Jr.", None, None, None)
            .await
            .unwrap();

        let meta = ScanMetadata::default();
        RecordModel::record_time_in(db, ana.id, session.id, event.id, at(9, 10), &meta)
            .await
            .unwrap()
            .record_time_out(db, at(11, 5), &meta)
            .await
            .unwrap();
        RecordModel::record_time_in(db, ben.id, session.id, event.id, at(10, 0) + Duration::minutes(15), &meta)
            .await
            .unwrap();

        event.id
    }

    #[tokio::test]
    async fn listing_returns_rows_kpis_and_pagination() {
        let (app, state) = make_test_app().await;
        let event_id = seed(&state).await;

        let response = app
            .clone()
            .oneshot(get(&format!("/api/events/{event_id}/attendance?sort=name&order=desc")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let data = &json_body(response).await["data"];

        assert_eq!(data["kpis"]["registered"], 2);
        assert_eq!(data["kpis"]["present"], 1);
        assert_eq!(data["kpis"]["late"], 1);
        assert_eq!(data["kpis"]["attendance_rate_percent"], 100.0);
        assert_eq!(data["rows"][0]["name"], "Ben Go, Jr.");
        assert_eq!(data["rows"][0]["status"], "late");
        assert_eq!(data["pagination"]["total"], 2);
        assert_eq!(data["pagination"]["page_size"], 50);
        assert_eq!(data["sessions"][0]["session_name"], "Opening");

        let response = app
            .oneshot(get(&format!("/api/events/{event_id}/attendance?status=present&q=ANA")))
            .await
            .unwrap();
        let data = &json_body(response).await["data"];
        assert_eq!(data["rows"].as_array().unwrap().len(), 1);
        assert_eq!(data["rows"][0]["student_id_number"], "A-1");
    }

    #[tokio::test]
    async fn export_returns_csv_attachment() {
        let (app, state) = make_test_app().await;
        let event_id = seed(&state).await;

        let response = app
            .clone()
            .oneshot(get(&format!("/api/events/{event_id}/attendance/export")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"ccs-week-day-1-attendance.csv\""
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv = String::from_utf8(body.to_vec()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Student ID,Name,Email,Program,Session,Status,Time In,Time Out");
        assert!(lines[1].starts_with("A-1,Ana Lim,ana@uni.edu,,Opening,present,"));
        assert!(lines[2].starts_with("B-2,\"Ben Go, Jr.\",,,Opening,late,"));

        let response = app
            .oneshot(get("/api/events/9999/attendance/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
