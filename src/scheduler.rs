use crate::core::{RateCache, RateSnapshot};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

/// Periodically refreshes the gold rate once it has gone stale.
pub struct RefreshScheduler {
    cache: Arc<RateCache>,
    every: Duration,
}

impl RefreshScheduler {
    pub fn new(cache: Arc<RateCache>, every: Duration) -> Self {
        Self { cache, every }
    }

    /// Runs one check. Errors are logged, never propagated.
    pub async fn tick(&self) -> Option<RateSnapshot> {
        match self.cache.refresh_if_stale().await {
            Ok(snapshot) => {
                if snapshot.source.is_degraded() {
                    warn!(
                        quote = %snapshot.quote,
                        warning = snapshot.warning.as_deref().unwrap_or_default(),
                        "Scheduled refresh failed, cached quote kept"
                    );
                } else {
                    info!(quote = %snapshot.quote, source = %snapshot.source, "Scheduled check done");
                }
                Some(snapshot)
            }
            Err(e) => {
                error!(error = %e, "Scheduled refresh failed");
                None
            }
        }
    }

    /// Ticks until `shutdown` completes and returns the number of checks run.
    pub async fn run_until<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        info!(every = ?self.every, "Starting gold rate refresh scheduler");
        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut ticks = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.tick().await;
                    ticks += 1;
                }
            }
        }
        info!(ticks, "Gold rate refresh scheduler stopped");
        ticks
    }
}
