mod common;

use axum::Router;
use axum_test::TestServer;
use link_shortener::api::routes::link_routes;
use serde_json::json;

#[tokio::test]
async fn test_link_routes_round_trip() {
    let (state, _store) = common::create_test_state();
    let app = Router::new().nest("/api", link_routes()).with_state(state);
    let server = TestServer::new(app).unwrap();

    let created = server
        .post("/api/save")
        .json(&json!({ "url": "www.ozon.ru" }))
        .await;
    assert_eq!(created.status_code(), 400);

    let created = server
        .post("/api/save")
        .json(&json!({ "url": "https://www.ozon.ru" }))
        .await;
    created.assert_status_ok();

    let resolved = server.get("/api/url/bGKXWuqfNR").await;
    resolved.assert_status_ok();
    assert_eq!(
        resolved.json::<serde_json::Value>()["url"],
        "https://www.ozon.ru"
    );
}

#[tokio::test]
async fn test_unknown_api_route() {
    let (state, _store) = common::create_test_state();
    let app = Router::new().nest("/api", link_routes()).with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/api/links").await;

    assert_eq!(response.status_code(), 404);
}
