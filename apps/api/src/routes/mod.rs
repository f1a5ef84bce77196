pub mod health;

use axum::{routing::get, Router};

use crate::fortune::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/fortune",
            get(handlers::handle_fortune_alive).post(handlers::handle_fortune),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::errors::GENERATION_FAILED_MESSAGE;
    use crate::fortune::service::tests::{StubGenerator, STUB_PAYLOAD};
    use crate::fortune::{FortuneService, RetryPolicy};

    fn app(stub: Arc<StubGenerator>) -> Router {
        let fortune = FortuneService::new(stub, Duration::from_secs(5), RetryPolicy::default());
        build_router(AppState {
            fortune,
            config: Config::for_tests(),
        })
    }

    async fn post_fortune(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/fortune")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_post_fortune_returns_result_schema() {
        let stub = Arc::new(StubGenerator::always(STUB_PAYLOAD));
        let (status, body) = post_fortune(
            app(stub.clone()),
            r#"{"birthDate":"2000-01-01","bloodType":"O","mode":"normal"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let expected: Value = serde_json::from_str(STUB_PAYLOAD).unwrap();
        assert_eq!(body, expected);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_post_fortune_empty_birth_date_is_400() {
        let stub = Arc::new(StubGenerator::always(STUB_PAYLOAD));
        let (status, body) =
            post_fortune(app(stub.clone()), r#"{"birthDate":"","bloodType":"A"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], crate::fortune::models::MISSING_FIELDS_MESSAGE);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_post_fortune_missing_fields_is_400() {
        let stub = Arc::new(StubGenerator::always(STUB_PAYLOAD));
        let (status, body) = post_fortune(app(stub.clone()), "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_post_fortune_broken_json_is_400_with_error_body() {
        let stub = Arc::new(StubGenerator::always(STUB_PAYLOAD));
        let (status, body) = post_fortune(app(stub.clone()), "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], handlers::MALFORMED_BODY_MESSAGE);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_post_fortune_unpadded_birth_date_is_400() {
        let stub = Arc::new(StubGenerator::always(STUB_PAYLOAD));
        let (status, body) =
            post_fortune(app(stub.clone()), r#"{"birthDate":"2000-1-1","bloodType":"O"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], crate::fortune::models::BIRTH_DATE_FORMAT_MESSAGE);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_post_fortune_malformed_provider_text_is_500_without_echo() {
        let raw = "SECRET model chatter without json";
        let stub = Arc::new(StubGenerator::always(raw));
        let (status, body) = post_fortune(
            app(stub),
            r#"{"birthDate":"2000-01-01","bloodType":"B"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], GENERATION_FAILED_MESSAGE);
        assert!(!body.to_string().contains("SECRET"));
    }

    #[tokio::test]
    async fn test_post_fortune_unknown_mode_uses_baseline() {
        let stub = Arc::new(StubGenerator::always(STUB_PAYLOAD));
        let (status, _) = post_fortune(
            app(stub.clone()),
            r#"{"birthDate":"2000-01-01","bloodType":"A","mode":"sparkly"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("ベテラン占い師"));
    }

    #[tokio::test]
    async fn test_get_fortune_is_alive() {
        let stub = Arc::new(StubGenerator::always(STUB_PAYLOAD));
        let response = app(stub)
            .oneshot(
                Request::builder()
                    .uri("/api/fortune")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_health() {
        let stub = Arc::new(StubGenerator::always(STUB_PAYLOAD));
        let response = app(stub)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["service"], "fortune-api");
        assert_eq!(body["model"], crate::config::DEFAULT_GEMINI_MODEL);
    }
}
