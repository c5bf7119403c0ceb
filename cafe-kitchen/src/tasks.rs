//! Poll scheduling
//!
//! [`PollTask`] runs [`KitchenFeed::poll`] on a fixed interval until
//! stopped. Ticks that land while a poll is still running are skipped,
//! both by the interval and by the feed's own reentrancy guard.

use crate::feed::{KitchenFeed, PollOutcome};
use cafe_client::RemoteStore;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Periodic poll task
pub struct PollTask {
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PollTask {
    /// Spawn the loop; the first poll runs immediately
    pub fn start<R>(feed: Arc<KitchenFeed<R>>, period: Duration) -> Self
    where
        R: RemoteStore + 'static,
    {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let run = async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!(period_secs = period.as_secs_f64(), "Kitchen poll task started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    _ = token.cancelled() => break,
                    result = feed.poll() => match result {
                        Ok(PollOutcome::Refreshed { new_order: Some(id), .. }) => {
                            tracing::debug!(order_id = %id, "Poll found a new order");
                        }
                        Ok(_) => {}
                        Err(e) => tracing::warn!(error = %e, "Poll failed, will retry next tick"),
                    }
                }
            }

            tracing::info!("Kitchen poll task stopped");
        };

        let handle = tokio::spawn(async move {
            if let Err(panic_info) = AssertUnwindSafe(run).catch_unwind().await {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                tracing::error!(panic = %panic_msg, "Kitchen poll task panicked");
            }
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Whether the loop is still alive
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the loop and wait for it to exit
    pub async fn stop(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            match handle.await {
                Ok(()) => tracing::debug!("Poll task joined"),
                Err(e) if e.is_cancelled() => tracing::debug!("Poll task cancelled"),
                Err(e) => tracing::error!(error = ?e, "Poll task failed"),
            }
        }
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
