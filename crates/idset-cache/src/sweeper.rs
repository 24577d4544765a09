//! Background eviction of expired cache entries.

use crate::store::ResultCache;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

/// Default period between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest period a sweeper runs at.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Periodically evicts expired entries from a [`ResultCache`].
pub struct CacheSweeper {
    cache: Arc<ResultCache>,
    interval: Duration,
}

impl CacheSweeper {
    /// Periods below [`MIN_SWEEP_INTERVAL`] are raised to it.
    pub fn new(cache: Arc<ResultCache>, interval: Duration) -> Self {
        Self {
            cache,
            interval: interval.max(MIN_SWEEP_INTERVAL),
        }
    }

    /// Run one sweep now.
    pub async fn sweep(&self) -> usize {
        let evicted = self.cache.evict_expired().await;
        if evicted > 0 {
            debug!(evicted, "Cache sweep finished");
        }
        evicted
    }

    /// Sweep on every tick until `shutdown` turns true or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.interval.as_secs(),
            "Starting cache sweeper"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Cache sweeper shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Run the sweep loop on its own task.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}
