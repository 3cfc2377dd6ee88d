//! Redis implementation of the link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, Value, aio::ConnectionManager};
use tracing::{debug, info};

use crate::domain::repositories::{ExpiryPolicy, LinkStore, SaveOutcome, StoreError};

const SAVE_ATTEMPTS: usize = 2;

/// Redis store keeping one string key per alias.
///
/// The expiry deadline is expressed as a per-key TTL, so Redis drops expired
/// mappings on its own and [`LinkStore::clear_expired`] has nothing to do.
pub struct RedisLinkStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisLinkStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - connection string (e.g., `"redis://localhost:6379"`)
    /// - `key_prefix` - namespace prepended to every alias key, may be empty
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::open(redis_url).map_err(|e| StoreError::backend("connect", e))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::backend("connect", e))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::backend("connect", e))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            conn: manager,
            key_prefix: key_prefix.into(),
        })
    }

    fn build_key(&self, alias: &str) -> String {
        format!("{}{}", self.key_prefix, alias)
    }

    async fn get(&self, alias: &str, operation: &'static str) -> Result<Option<String>, StoreError> {
        let key = self.build_key(alias);
        let mut conn = self.conn.clone();

        conn.get::<_, Option<String>>(&key)
            .await
            .map_err(|e| StoreError::backend(operation, e))
    }
}

/// Milliseconds from now until `expires_at`; negative once it has passed.
fn millis_until(expires_at: DateTime<Utc>) -> i64 {
    (expires_at - Utc::now()).num_milliseconds()
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn lookup(&self, alias: &str) -> Result<String, StoreError> {
        self.get(alias, "lookup")
            .await?
            .ok_or_else(|| StoreError::not_found(alias))
    }

    async fn check_alias(&self, alias: &str) -> Result<Option<String>, StoreError> {
        self.get(alias, "check_alias").await
    }

    async fn save(
        &self,
        original: &str,
        alias: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SaveOutcome, StoreError> {
        let key = self.build_key(alias);
        // PX rejects zero, so a deadline that is already due still lives 1ms.
        let ttl_ms = millis_until(expires_at).max(1);

        for _ in 0..SAVE_ATTEMPTS {
            let mut conn = self.conn.clone();
            let reply: Value = redis::cmd("SET")
                .arg(&key)
                .arg(original)
                .arg("NX")
                .arg("PX")
                .arg(ttl_ms)
                .query_async(&mut conn)
                .await
                .map_err(|e| StoreError::backend("save", e))?;

            if !matches!(reply, Value::Nil) {
                debug!(alias, ttl_ms, "Link key written");
                return Ok(SaveOutcome::Created);
            }

            if let Some(existing) = self.get(alias, "save").await? {
                return Ok(SaveOutcome::Occupied(existing));
            }
        }

        Err(StoreError::backend(
            "save",
            format!("alias {alias} changed owner during insert"),
        ))
    }

    async fn renew_expiry(&self, expires_at: DateTime<Utc>, alias: &str) -> Result<(), StoreError> {
        let key = self.build_key(alias);
        let mut conn = self.conn.clone();

        let updated: i64 = redis::cmd("PEXPIRE")
            .arg(&key)
            .arg(millis_until(expires_at))
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::backend("renew_expiry", e))?;

        if updated == 0 {
            debug!(alias, "Renewal skipped, no such key");
        }

        Ok(())
    }

    async fn clear_expired(&self) -> Result<u64, StoreError> {
        Ok(0)
    }

    async fn close(&self) -> Result<(), StoreError> {
        // ConnectionManager has no explicit shutdown; the socket goes with the last clone.
        info!("Redis connection released");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::NativeTtl
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
