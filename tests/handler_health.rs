mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use link_shortener::api::handlers::health_handler;
use link_shortener::state::AppState;
use std::sync::Arc;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _store) = common::create_test_state();
    let server = server(state);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["store"]["backend"], "memory");
    assert_eq!(json["checks"]["store"]["expiry_policy"], "sweep");
    assert!(json["checks"]["store"].get("message").is_none());
}

#[tokio::test]
async fn test_health_endpoint_degraded() {
    let state = common::create_test_state_with(Arc::new(common::UnreachableStore));
    let server = server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["store"]["status"], "error");
    assert_eq!(json["checks"]["store"]["expiry_policy"], "native_ttl");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let (state, _store) = common::create_test_state();
    let server = server(state);

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("store").is_some());
}
