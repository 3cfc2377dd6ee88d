//! Link store backends and the factory that picks one at startup.
//!
//! # Backends
//!
//! - [`PgLinkStore`] - PostgreSQL table with an explicit expiry column
//! - [`RedisLinkStore`] - Redis keys with native TTL
//! - [`MemoryLinkStore`] - in-process map for development and tests

pub mod memory_link_store;
pub mod pg_link_store;
pub mod redis_link_store;

pub use memory_link_store::MemoryLinkStore;
pub use pg_link_store::{PgLinkStore, PgPoolSettings};
pub use redis_link_store::RedisLinkStore;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

use crate::domain::repositories::{LinkStore, StoreError};

/// Connection attempts made by [`connect_store`] before giving up.
const CONNECT_ATTEMPTS: usize = 5;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreBackend {
    Postgres,
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "redis" => Ok(Self::Redis),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(format!(
                "unknown store backend '{other}', expected postgres, redis or memory"
            )),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => f.write_str("postgres"),
            Self::Redis => f.write_str("redis"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Everything needed to open one backend.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Postgres {
        database_url: String,
        pool: PgPoolSettings,
    },
    Redis {
        redis_url: String,
        key_prefix: String,
    },
    Memory,
}

impl StoreConfig {
    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Postgres { .. } => StoreBackend::Postgres,
            Self::Redis { .. } => StoreBackend::Redis,
            Self::Memory => StoreBackend::Memory,
        }
    }
}

fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(CONNECT_ATTEMPTS - 1)
}

/// Opens the configured backend, retrying transient connection failures
/// with exponential backoff.
///
/// PostgreSQL migrations are applied once the pool is up.
///
/// # Errors
///
/// Returns the last [`StoreError`] if every attempt fails, or the migration
/// error for PostgreSQL.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn LinkStore>, StoreError> {
    let store: Arc<dyn LinkStore> = match config {
        StoreConfig::Postgres { database_url, pool } => {
            let mut attempt = 0;
            let store = Retry::start(retry_strategy(), || {
                attempt += 1;
                let n = attempt;
                async move {
                    PgLinkStore::connect(database_url, pool)
                        .await
                        .inspect_err(|e| warn!(attempt = n, error = %e, "PostgreSQL connect failed"))
                }
            })
            .await?;

            store.migrate().await?;
            Arc::new(store)
        }
        StoreConfig::Redis {
            redis_url,
            key_prefix,
        } => {
            let mut attempt = 0;
            let store = Retry::start(retry_strategy(), || {
                attempt += 1;
                let n = attempt;
                async move {
                    RedisLinkStore::connect(redis_url, key_prefix.as_str())
                        .await
                        .inspect_err(|e| warn!(attempt = n, error = %e, "Redis connect failed"))
                }
            })
            .await?;

            Arc::new(store)
        }
        StoreConfig::Memory => Arc::new(MemoryLinkStore::new()),
    };

    info!(
        backend = store.backend_name(),
        expiry_policy = %store.expiry_policy(),
        "Link store ready"
    );

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("postgres".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!(" PG ".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!("Redis".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("mysql".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_backend_display_round_trips() {
        for backend in [StoreBackend::Postgres, StoreBackend::Redis, StoreBackend::Memory] {
            assert_eq!(backend.to_string().parse::<StoreBackend>(), Ok(backend));
        }
    }

    #[test]
    fn test_retry_strategy_is_bounded() {
        let delays: Vec<Duration> = retry_strategy().collect();
        assert_eq!(delays.len(), CONNECT_ATTEMPTS - 1);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_connect_memory_store() {
        let store = connect_store(&StoreConfig::Memory).await.unwrap();

        assert_eq!(store.backend_name(), "memory");
        assert!(store.health_check().await);
        assert_eq!(StoreConfig::Memory.backend(), StoreBackend::Memory);
    }

    #[tokio::test]
    async fn test_connect_redis_rejects_malformed_url() {
        let config = StoreConfig::Redis {
            redis_url: "not a url".to_string(),
            key_prefix: String::new(),
        };

        let result = tokio::time::timeout(Duration::from_secs(30), connect_store(&config)).await;

        assert!(matches!(result, Ok(Err(StoreError::Backend { .. }))));
    }
}
