#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use link_shortener::application::services::LinkService;
use link_shortener::domain::entities::Link;
use link_shortener::domain::repositories::{
    ExpiryPolicy, LinkStore, SaveOutcome, StoreError,
};
use link_shortener::infrastructure::persistence::MemoryLinkStore;
use link_shortener::state::AppState;
use link_shortener::utils::alias_encoder::AliasEncoder;
use std::io;
use std::sync::Arc;

pub const BASE_URL: &str = "http://sho.rt/";

pub fn link_ttl() -> Duration {
    Duration::hours(24)
}

pub fn create_test_state() -> (AppState, Arc<MemoryLinkStore>) {
    let store = Arc::new(MemoryLinkStore::new());
    let state = create_test_state_with(store.clone());
    (state, store)
}

pub fn create_test_state_with(store: Arc<dyn LinkStore>) -> AppState {
    let link_service = LinkService::new(store, AliasEncoder::default(), link_ttl());
    AppState::new(Arc::new(link_service), BASE_URL)
}

pub fn live_link(original: &str, alias: &str) -> Link {
    Link::new(original, alias, Utc::now() + Duration::hours(1))
}

pub fn expired_link(original: &str, alias: &str) -> Link {
    Link::new(original, alias, Utc::now() - Duration::seconds(1))
}

/// Store whose backend is unreachable: every call fails.
pub struct UnreachableStore;

fn refused(operation: &'static str) -> StoreError {
    StoreError::backend(
        operation,
        io::Error::other("connection refused (host=db.internal user=admin)"),
    )
}

#[async_trait]
impl LinkStore for UnreachableStore {
    async fn lookup(&self, _alias: &str) -> Result<String, StoreError> {
        Err(refused("lookup"))
    }

    async fn check_alias(&self, _alias: &str) -> Result<Option<String>, StoreError> {
        Err(refused("check_alias"))
    }

    async fn save(
        &self,
        _original: &str,
        _alias: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<SaveOutcome, StoreError> {
        Err(refused("save"))
    }

    async fn renew_expiry(
        &self,
        _expires_at: DateTime<Utc>,
        _alias: &str,
    ) -> Result<(), StoreError> {
        Err(refused("renew_expiry"))
    }

    async fn clear_expired(&self) -> Result<u64, StoreError> {
        Err(refused("clear_expired"))
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::NativeTtl
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}
