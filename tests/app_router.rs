mod common;

use async_trait::async_trait;
use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use link_shortener::domain::repositories::{ExpiryPolicy, LinkStore, SaveOutcome, StoreError};
use link_shortener::routes::app_router;
use link_shortener::state::AppState;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn server(state: AppState, request_timeout: Duration) -> TestServer {
    let app = app_router(state, request_timeout);
    TestServer::new(ServiceExt::<Request>::into_make_service(app)).unwrap()
}

/// Store that answers lookups only after a delay.
struct SlowStore(Duration);

#[async_trait]
impl LinkStore for SlowStore {
    async fn lookup(&self, alias: &str) -> Result<String, StoreError> {
        tokio::time::sleep(self.0).await;
        Err(StoreError::NotFound {
            alias: alias.to_string(),
        })
    }

    async fn check_alias(&self, _alias: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn save(
        &self,
        _original: &str,
        _alias: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<SaveOutcome, StoreError> {
        Ok(SaveOutcome::Created)
    }

    async fn renew_expiry(
        &self,
        _expires_at: DateTime<Utc>,
        _alias: &str,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    async fn clear_expired(&self) -> Result<u64, StoreError> {
        Ok(0)
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::NativeTtl
    }

    fn backend_name(&self) -> &'static str {
        "slow"
    }
}

#[tokio::test]
async fn test_health_is_not_treated_as_alias() {
    let (state, store) = common::create_test_state();
    store.put(common::live_link("https://example.com/health", "health"));
    let server = server(state, Duration::from_secs(10));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["backend"], "memory");
}

#[tokio::test]
async fn test_create_then_redirect_through_full_router() {
    let (state, store) = common::create_test_state();
    let server = server(state, Duration::from_secs(10));

    let created = server
        .post("/api/save")
        .json(&json!({ "url": "https://www.ozon.ru" }))
        .await;
    created.assert_status_ok();
    assert_eq!(
        created.json::<serde_json::Value>()["url"],
        "http://sho.rt/bGKXWuqfNR"
    );

    let response = server.get("/bGKXWuqfNR").await;
    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://www.ozon.ru");
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn test_trailing_slash_is_trimmed() {
    let (state, store) = common::create_test_state();
    store.put(common::live_link("https://example.com/target", "slashed"));
    let server = server(state, Duration::from_secs(10));

    server.get("/health/").await.assert_status_ok();

    let resolved = server.get("/api/url/slashed/").await;
    resolved.assert_status_ok();
    assert_eq!(
        resolved.json::<serde_json::Value>()["url"],
        "https://example.com/target"
    );

    let redirect = server.get("/slashed/").await;
    assert_eq!(redirect.status_code(), 307);
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let store: Arc<dyn LinkStore> = Arc::new(SlowStore(Duration::from_secs(2)));
    let state = common::create_test_state_with(store);
    let server = server(state, Duration::from_millis(50));

    let response = server.get("/api/url/anything").await;

    assert_eq!(response.status_code(), 408);
}
