//! In-process link store for development and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::Link;
use crate::domain::repositories::{ExpiryPolicy, LinkStore, SaveOutcome, StoreError};

/// Link store backed by a sharded concurrent map.
///
/// Behaves like the PostgreSQL store: expired links are hidden from reads
/// right away and physically removed by [`LinkStore::clear_expired`].
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    links: DashMap<String, Link>,
    writes: AtomicU64,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `link` as is, bypassing the insert-if-absent check.
    ///
    /// Handy for seeding links with a deadline already in the past.
    pub fn put(&self, link: Link) {
        self.links.insert(link.alias.clone(), link);
    }

    /// Returns the stored record for `alias`, expired or not.
    pub fn get_raw(&self, alias: &str) -> Option<Link> {
        self.links.get(alias).map(|link| link.value().clone())
    }

    /// Number of records held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Number of successful [`LinkStore::save`] calls that wrote a record.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn live_original(&self, alias: &str) -> Option<String> {
        self.links
            .get(alias)
            .filter(|link| !link.is_expired())
            .map(|link| link.original.clone())
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn lookup(&self, alias: &str) -> Result<String, StoreError> {
        self.live_original(alias)
            .ok_or_else(|| StoreError::not_found(alias))
    }

    async fn check_alias(&self, alias: &str) -> Result<Option<String>, StoreError> {
        Ok(self.live_original(alias))
    }

    async fn save(
        &self,
        original: &str,
        alias: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SaveOutcome, StoreError> {
        let link = Link::new(original, alias, expires_at);

        // The entry guard holds the shard lock, so check and write are one step.
        match self.links.entry(alias.to_owned()) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_expired() {
                    return Ok(SaveOutcome::Occupied(occupied.get().original.clone()));
                }
                occupied.insert(link);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(link);
            }
        }

        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(SaveOutcome::Created)
    }

    async fn renew_expiry(&self, expires_at: DateTime<Utc>, alias: &str) -> Result<(), StoreError> {
        if let Some(mut link) = self.links.get_mut(alias) {
            link.expires_at = expires_at;
        }
        Ok(())
    }

    async fn clear_expired(&self) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut removed = 0u64;

        self.links.retain(|_, link| {
            let keep = !link.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        Ok(removed)
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::Sweep
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
