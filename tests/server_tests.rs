#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use rotating_bloom_rs::api::create_router;
    use rotating_bloom_rs::types::AppState;
    use rotating_bloom_rs::{
        FilterConfigBuilder, InMemoryStorage, RotatingBloomSeries,
    };
    use serde_json::json;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn setup_test_app() -> Router {
        let config = FilterConfigBuilder::default()
            .capacity(Some(1000))
            .false_positive_rate(Some(0.01))
            .build()
            .unwrap();

        let series = RotatingBloomSeries::new(
            Arc::new(InMemoryStorage::new()),
            format!("test_series_{}", rand::random::<u64>()),
            config,
        )
        .unwrap();

        let state = Arc::new(AppState { series });
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_and_query() {
        let app = setup_test_app();
        let test_value = "test_item";

        let add_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/items")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "value": test_value }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(add_response.status(), StatusCode::OK);

        let query_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/items/{}", test_value))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(query_response.status(), StatusCode::OK);

        let body_bytes = body::to_bytes(query_response.into_body(), 100)
            .await
            .unwrap();
        let response: serde_json::Value =
            serde_json::from_slice(&body_bytes).unwrap();

        assert_eq!(response["exists"], true);

        // unseen item
        let query_response = app
            .oneshot(
                Request::builder()
                    .uri("/items/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body_bytes = body::to_bytes(query_response.into_body(), 100)
            .await
            .unwrap();
        let response: serde_json::Value =
            serde_json::from_slice(&body_bytes).unwrap();

        assert_eq!(response["exists"], false);
    }

    #[tokio::test]
    async fn test_delete_removes_item() {
        let app = setup_test_app();
        let test_value = "regretted_item";

        let _ = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/items")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "value": test_value }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let delete_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/items/{}", test_value))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(delete_response.status(), StatusCode::OK);

        let query_response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/items/{}", test_value))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body_bytes = body::to_bytes(query_response.into_body(), 100)
            .await
            .unwrap();
        let response: serde_json::Value =
            serde_json::from_slice(&body_bytes).unwrap();

        assert_eq!(response["exists"], false);
    }
}
