mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use link_shortener::api::handlers::redirect_handler;
use link_shortener::state::AppState;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/{alias}", get(redirect_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_success() {
    let (state, store) = common::create_test_state();
    store.put(common::live_link("https://example.com/target", "redirect1"));
    let server = server(state);

    let response = server.get("/redirect1").await;

    assert_eq!(response.status_code(), 307);

    let location = response.header("location");
    assert_eq!(location, "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (state, _store) = common::create_test_state();
    let server = server(state);

    let response = server.get("/nonexistent").await;

    assert_eq!(response.status_code(), 404);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_expired_link() {
    let (state, store) = common::create_test_state();
    store.put(common::expired_link("https://example.com/old", "expired1"));
    let server = server(state);

    let response = server.get("/expired1").await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_redirect_renews_link() {
    let (state, store) = common::create_test_state();
    let link = common::live_link("https://example.com/target", "renew1");
    let original_deadline = link.expires_at;
    store.put(link);
    let server = server(state);

    server.get("/renew1").await;

    assert!(store.get_raw("renew1").unwrap().expires_at > original_deadline);
}
