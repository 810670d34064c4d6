use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use imagegen_service::config::AppConfig;
use imagegen_service::services::providers::mock::{MockBehavior, MockImageProvider};
use imagegen_service::startup::build_router;
use imagegen_service::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;

#[tokio::test]
async fn health_check_works() {
    let provider = Arc::new(MockImageProvider::new(MockBehavior::NoCandidates));
    let app = build_router(AppState::new(AppConfig::default(), provider));

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

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "imagegen-service");
}

#[tokio::test]
async fn readiness_reflects_provider_health() {
    let provider = Arc::new(MockImageProvider::new(MockBehavior::NoCandidates));
    let app = build_router(AppState::new(AppConfig::default(), provider));

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_fails_when_provider_is_unhealthy() {
    let provider = Arc::new(MockImageProvider::unhealthy(MockBehavior::NoCandidates));
    let app = build_router(AppState::new(AppConfig::default(), provider));

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
