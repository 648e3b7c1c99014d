#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::helpers::{json_body, make_test_app};

    fn health_request() -> Request<AxumBody> {
        Request::builder()
            .method("GET")
            .uri("/api/health")
            .body(AxumBody::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_a_reachable_database() {
        let (app, _) = make_test_app().await;

        let response = app.oneshot(health_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["database"], "reachable");
        assert_eq!(json["data"]["environment"], "test");
        assert_eq!(json["message"], "Attendance service is ready");
    }

    #[tokio::test]
    async fn health_is_unavailable_once_the_pool_is_closed() {
        let (app, state) = make_test_app().await;
        state.db_clone().close().await.unwrap();

        let response = app.oneshot(health_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["database"], "unreachable");
    }
}
