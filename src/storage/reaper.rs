//! Expiration Reaper
//!
//! Scoped background task that periodically removes expired scalars.
//! It is started together with the cache and stops on `stop()` or drop.

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::Keyspace;
use crate::error::{CacheError, Result};
use crate::metrics::Metrics;

/// Handle to the running expiration task
#[derive(Debug)]
pub struct Reaper {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl Reaper {
    /// Spawn the reaper on the current Tokio runtime
    pub fn spawn(keyspace: Arc<Keyspace>, metrics: Arc<Metrics>, period: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        let token = CancellationToken::new();
        let handle = runtime.spawn(Self::run(keyspace, metrics, period, token.clone()));

        Ok(Self {
            token,
            handle: Some(handle),
            interval: period,
        })
    }

    async fn run(
        keyspace: Arc<Keyspace>,
        metrics: Arc<Metrics>,
        period: Duration,
        token: CancellationToken,
    ) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        info!("Expiration reaper started, interval: {:?}", period);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = keyspace.purge_expired();
                    metrics.record_sweep(removed);
                    if removed > 0 {
                        debug!(removed = removed, "Reaped expired keys");
                    }
                }
            }
        }

        info!("Expiration reaper stopped");
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True until the task has been cancelled and has finished
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Signal the task to stop without waiting for it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Stop the task and wait for it to finish
    ///
    /// A panic inside a sweep is an invariant violation and is re-raised here.
    pub async fn stop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    std::panic::resume_unwind(e.into_panic());
                }
            }
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
