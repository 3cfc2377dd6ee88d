//! Storage abstraction for alias mappings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Boxed backend error carried by [`StoreError::Backend`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by [`LinkStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The alias has no live mapping (never created, expired or swept).
    #[error("no such link: {alias}")]
    NotFound { alias: String },

    /// Any other backend failure, tagged with the operation that failed.
    #[error("link store {operation} failed: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn not_found(alias: impl Into<String>) -> Self {
        Self::NotFound {
            alias: alias.into(),
        }
    }

    pub fn backend(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Backend {
            operation,
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// How a store gets rid of expired mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Expired rows stay until [`LinkStore::clear_expired`] is called periodically.
    Sweep,
    /// The backend drops keys on its own via per-key time-to-live.
    NativeTtl,
}

impl ExpiryPolicy {
    pub fn needs_sweep(self) -> bool {
        matches!(self, Self::Sweep)
    }
}

impl fmt::Display for ExpiryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sweep => f.write_str("sweep"),
            Self::NativeTtl => f.write_str("native_ttl"),
        }
    }
}

/// Result of an atomic insert-if-absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The mapping was written.
    Created,
    /// A live mapping already holds the alias; nothing was written.
    Occupied(String),
}

/// Persistence contract shared by the PostgreSQL, Redis and in-memory backends.
///
/// Every operation addresses a mapping by alias. Expired mappings must be
/// invisible to `lookup` and `check_alias` regardless of whether they have
/// been physically removed yet.
///
/// Connecting is backend specific: see
/// [`crate::infrastructure::persistence::connect_store`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL, swept periodically
/// - [`crate::infrastructure::persistence::RedisLinkStore`] - Redis, native TTL
/// - [`crate::infrastructure::persistence::MemoryLinkStore`] - in-process, swept periodically
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Returns the original URL mapped to `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the alias has no live mapping.
    /// Returns [`StoreError::Backend`] on any other failure.
    async fn lookup(&self, alias: &str) -> Result<String, StoreError>;

    /// Checks whether `alias` is in use.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(original))` if a live mapping exists
    /// - `Ok(None)` if the alias is unused
    async fn check_alias(&self, alias: &str) -> Result<Option<String>, StoreError>;

    /// Writes `alias -> original` unless a live mapping already holds the alias.
    ///
    /// The check and the write happen atomically inside the backend.
    async fn save(
        &self,
        original: &str,
        alias: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SaveOutcome, StoreError>;

    /// Moves the expiry deadline of `alias` to `expires_at`.
    async fn renew_expiry(&self, expires_at: DateTime<Utc>, alias: &str) -> Result<(), StoreError>;

    /// Removes mappings whose deadline has passed and returns how many were removed.
    ///
    /// Backends with [`ExpiryPolicy::NativeTtl`] return `Ok(0)` without doing anything.
    async fn clear_expired(&self) -> Result<u64, StoreError>;

    /// Releases backend connections.
    async fn close(&self) -> Result<(), StoreError>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;

    fn expiry_policy(&self) -> ExpiryPolicy;

    /// Short backend name used in logs and health output.
    fn backend_name(&self) -> &'static str;
}
