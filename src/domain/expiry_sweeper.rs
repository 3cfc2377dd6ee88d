//! Periodic removal of expired links for stores that do not expire rows natively.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{Instrument, Span, debug, error, info};

use crate::domain::repositories::{LinkStore, StoreError};

/// Longest period the sweeper accepts; larger values are clamped.
pub const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(10 * 365 * 86_400);

/// Runs one sweep pass and logs its outcome.
pub async fn sweep_once(store: &dyn LinkStore) -> Result<u64, StoreError> {
    match store.clear_expired().await {
        Ok(removed) => {
            info!(removed, backend = store.backend_name(), "Expired links swept");
            Ok(removed)
        }
        Err(e) => {
            error!(error = %e, backend = store.backend_name(), "Expired link sweep failed");
            Err(e)
        }
    }
}

/// Sweeps expired links every `period`, forever.
///
/// The first pass runs one full period after start, with `period` clamped to
/// [`MAX_SWEEP_PERIOD`]. A failed pass is logged and retried on the next
/// tick; the loop never exits on its own.
pub async fn run_expiry_sweeper(store: Arc<dyn LinkStore>, period: Duration, span: Span) {
    async move {
        let period = period.min(MAX_SWEEP_PERIOD);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(period_secs = period.as_secs(), "Expiry sweeper started");

        loop {
            ticker.tick().await;
            debug!("Expiry sweep tick");
            let _ = sweep_once(store.as_ref()).await;
        }
    }
    .instrument(span)
    .await
}

/// Spawns [`run_expiry_sweeper`] on the runtime.
///
/// Abort the returned handle to stop sweeping.
pub fn spawn_expiry_sweeper(
    store: Arc<dyn LinkStore>,
    period: Duration,
    span: Span,
) -> JoinHandle<()> {
    tokio::spawn(run_expiry_sweeper(store, period, span))
}
