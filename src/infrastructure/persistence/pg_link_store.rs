//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::repositories::{ExpiryPolicy, LinkStore, SaveOutcome, StoreError};

const SELECT_LIVE_ORIGINAL: &str = r#"
    SELECT original
    FROM urls
    WHERE short = $1
      AND expiration_time > NOW()
"#;

// An expired row that has not been swept yet counts as free and is replaced.
const INSERT_IF_ABSENT: &str = r#"
    INSERT INTO urls (original, short, expiration_time)
    VALUES ($1, $2, $3)
    ON CONFLICT (short) DO UPDATE
        SET original = EXCLUDED.original,
            expiration_time = EXCLUDED.expiration_time
        WHERE urls.expiration_time <= NOW()
"#;

const UPDATE_EXPIRY: &str = r#"
    UPDATE urls
    SET expiration_time = $1
    WHERE short = $2
"#;

const DELETE_EXPIRED: &str = r#"
    DELETE FROM urls
    WHERE expiration_time < NOW()
"#;

/// Attempts made by [`PgLinkStore::save`] when a conflicting row disappears
/// between the insert and the follow-up check.
const SAVE_ATTEMPTS: usize = 2;

/// Connection pool tuning for [`PgLinkStore::connect`].
#[derive(Debug, Clone)]
pub struct PgPoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PgPoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// PostgreSQL store keeping mappings in the `urls` table.
///
/// Every row carries an explicit `expiration_time`; rows past it are hidden
/// from reads immediately and physically removed by [`LinkStore::clear_expired`].
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

impl PgLinkStore {
    /// Creates a store on top of an existing pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Opens a connection pool to `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the pool cannot be established.
    pub async fn connect(database_url: &str, settings: &PgPoolSettings) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .idle_timeout(settings.idle_timeout)
            .max_lifetime(settings.max_lifetime)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::backend("connect", e))?;

        info!(
            max_connections = settings.max_connections,
            "✓ Connected to PostgreSQL"
        );

        Ok(Self::new(Arc::new(pool)))
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::backend("migrate", e))?;

        info!("✓ Migrations applied");
        Ok(())
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn lookup(&self, alias: &str) -> Result<String, StoreError> {
        sqlx::query_scalar::<_, String>(SELECT_LIVE_ORIGINAL)
            .bind(alias)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => StoreError::not_found(alias),
                other => StoreError::backend("lookup", other),
            })
    }

    async fn check_alias(&self, alias: &str) -> Result<Option<String>, StoreError> {
        sqlx::query_scalar::<_, String>(SELECT_LIVE_ORIGINAL)
            .bind(alias)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::backend("check_alias", e))
    }

    async fn save(
        &self,
        original: &str,
        alias: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SaveOutcome, StoreError> {
        for _ in 0..SAVE_ATTEMPTS {
            let result = sqlx::query(INSERT_IF_ABSENT)
                .bind(original)
                .bind(alias)
                .bind(expires_at)
                .execute(self.pool.as_ref())
                .await
                .map_err(|e| StoreError::backend("save", e))?;

            if result.rows_affected() > 0 {
                debug!(alias, "Link row written");
                return Ok(SaveOutcome::Created);
            }

            if let Some(existing) = self.check_alias(alias).await? {
                return Ok(SaveOutcome::Occupied(existing));
            }
        }

        Err(StoreError::backend(
            "save",
            format!("alias {alias} changed owner during insert"),
        ))
    }

    async fn renew_expiry(&self, expires_at: DateTime<Utc>, alias: &str) -> Result<(), StoreError> {
        let result = sqlx::query(UPDATE_EXPIRY)
            .bind(expires_at)
            .bind(alias)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::backend("renew_expiry", e))?;

        if result.rows_affected() == 0 {
            debug!(alias, "Renewal skipped, no such row");
        }

        Ok(())
    }

    async fn clear_expired(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_EXPIRED)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::backend("clear_expired", e))?;

        let removed = result.rows_affected();
        debug!(removed, "Expired rows deleted");
        Ok(removed)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }

    fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::Sweep
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
