//! PostgreSQL store tests. Need a database:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use chrono::{Duration, Utc};
use link_shortener::domain::repositories::{ExpiryPolicy, LinkStore, SaveOutcome};
use link_shortener::infrastructure::persistence::PgLinkStore;
use sqlx::PgPool;
use std::sync::Arc;

async fn insert_row(pool: &PgPool, original: &str, alias: &str, expires_in: Duration) {
    sqlx::query("INSERT INTO urls (original, short, expiration_time) VALUES ($1, $2, $3)")
        .bind(original)
        .bind(alias)
        .bind(Utc::now() + expires_in)
        .execute(pool)
        .await
        .unwrap();
}

async fn row_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
#[ignore]
async fn test_save_and_lookup(pool: PgPool) {
    let store = PgLinkStore::new(Arc::new(pool));

    let outcome = store
        .save("https://www.ozon.ru", "bGKXWuqfNR", Utc::now() + Duration::hours(24))
        .await
        .unwrap();

    assert_eq!(outcome, SaveOutcome::Created);
    assert_eq!(
        store.lookup("bGKXWuqfNR").await.unwrap(),
        "https://www.ozon.ru"
    );
    assert_eq!(
        store.check_alias("bGKXWuqfNR").await.unwrap().as_deref(),
        Some("https://www.ozon.ru")
    );
}

#[sqlx::test]
#[ignore]
async fn test_lookup_unknown_alias(pool: PgPool) {
    let store = PgLinkStore::new(Arc::new(pool));

    let err = store.lookup("unknown-alias").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(store.check_alias("unknown-alias").await.unwrap(), None);
}

#[sqlx::test]
#[ignore]
async fn test_save_keeps_live_row(pool: PgPool) {
    insert_row(&pool, "https://first.example", "taken", Duration::hours(1)).await;
    let store = PgLinkStore::new(Arc::new(pool));

    let outcome = store
        .save("https://second.example", "taken", Utc::now() + Duration::hours(24))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SaveOutcome::Occupied("https://first.example".to_string())
    );
    assert_eq!(store.lookup("taken").await.unwrap(), "https://first.example");
}

#[sqlx::test]
#[ignore]
async fn test_expired_row_is_hidden_and_replaceable(pool: PgPool) {
    insert_row(&pool, "https://old.example", "stale", Duration::seconds(-5)).await;
    let store = PgLinkStore::new(Arc::new(pool));

    assert!(store.lookup("stale").await.unwrap_err().is_not_found());
    assert_eq!(store.check_alias("stale").await.unwrap(), None);

    let outcome = store
        .save("https://new.example", "stale", Utc::now() + Duration::hours(24))
        .await
        .unwrap();

    assert_eq!(outcome, SaveOutcome::Created);
    assert_eq!(store.lookup("stale").await.unwrap(), "https://new.example");
}

#[sqlx::test]
#[ignore]
async fn test_renew_expiry(pool: PgPool) {
    insert_row(&pool, "https://example.com", "renew", Duration::seconds(2)).await;
    let store = PgLinkStore::new(Arc::new(pool.clone()));

    let deadline = Utc::now() + Duration::hours(24);
    store.renew_expiry(deadline, "renew").await.unwrap();

    let stored: chrono::DateTime<Utc> =
        sqlx::query_scalar("SELECT expiration_time FROM urls WHERE short = $1")
            .bind("renew")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!((stored - deadline).num_milliseconds().abs() < 1);
}

#[sqlx::test]
#[ignore]
async fn test_renew_missing_alias_is_noop(pool: PgPool) {
    let store = PgLinkStore::new(Arc::new(pool.clone()));

    store
        .renew_expiry(Utc::now() + Duration::hours(1), "missing")
        .await
        .unwrap();

    assert_eq!(row_count(&pool).await, 0);
}

#[sqlx::test]
#[ignore]
async fn test_clear_expired(pool: PgPool) {
    insert_row(&pool, "https://old-1.example", "old1", Duration::seconds(-10)).await;
    insert_row(&pool, "https://old-2.example", "old2", Duration::seconds(-10)).await;
    insert_row(&pool, "https://fresh.example", "fresh", Duration::hours(1)).await;
    let store = PgLinkStore::new(Arc::new(pool.clone()));

    assert_eq!(store.clear_expired().await.unwrap(), 2);
    assert_eq!(row_count(&pool).await, 1);
    assert_eq!(store.clear_expired().await.unwrap(), 0);
}

#[sqlx::test]
#[ignore]
async fn test_metadata_and_health(pool: PgPool) {
    let store = PgLinkStore::new(Arc::new(pool));

    assert!(store.health_check().await);
    assert_eq!(store.expiry_policy(), ExpiryPolicy::Sweep);
    assert_eq!(store.backend_name(), "postgres");
}
