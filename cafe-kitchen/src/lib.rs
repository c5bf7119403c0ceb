//! Cafe Kitchen - operator-side order feed
//!
//! - [`KitchenFeed`]: polling, new-order detection, status transitions
//! - [`NotificationController`]: new-order alert lifecycle
//! - [`PollTask`]: fixed-interval scheduler with start/stop
//! - [`KitchenRuntime`]: wires the three together with a clean shutdown

pub mod alert;
pub mod config;
pub mod error;
pub mod feed;
pub mod logger;
pub mod tasks;

pub use alert::{AlertSink, LogAlertSink, NotificationController, alert_text};
pub use config::KitchenConfig;
pub use error::{FeedError, FeedResult};
pub use feed::{FulfillmentFilter, KitchenFeed, PollOutcome};
pub use tasks::PollTask;

use cafe_client::RemoteStore;
use std::sync::Arc;

/// A running kitchen feed
///
/// Shutting down stops the poll timer and disposes the alert controller,
/// so no timer outlives the feed.
pub struct KitchenRuntime<R> {
    feed: Arc<KitchenFeed<R>>,
    task: PollTask,
}

impl<R: RemoteStore + 'static> KitchenRuntime<R> {
    /// Build the feed and start polling
    pub fn start(store: R, config: &KitchenConfig, sink: Arc<dyn AlertSink>) -> Self {
        let alerts = NotificationController::new(sink, config.alert_duration);
        let feed = Arc::new(KitchenFeed::new(store, alerts));
        let task = PollTask::start(feed.clone(), config.poll_interval);
        Self { feed, task }
    }

    pub fn feed(&self) -> &Arc<KitchenFeed<R>> {
        &self.feed
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    /// Stop polling and clear pending alerts
    pub async fn shutdown(mut self) {
        tracing::info!("Shutting down kitchen feed...");
        self.task.stop().await;
        self.feed.alerts().dispose();
        tracing::info!("Kitchen feed stopped");
    }
}
