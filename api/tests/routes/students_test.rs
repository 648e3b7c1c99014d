#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::helpers::{json_body, json_request, make_test_app};

    #[tokio::test]
    async fn register_student_and_reject_duplicate() {
        let (app, _) = make_test_app().await;
        let body = json!({
            "student_id_number": "ST:2022-0001",
            "first_name": "Mara",
            "last_name": "Santos",
            "email": "mara@campus.edu",
            "program": "BSCS",
            "year": 2
        });

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/students", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["data"]["student_id_number"], "2022-0001");

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/students", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/students",
                json!({ "student_id_number": "x y", "first_name": "A", "last_name": "B" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
