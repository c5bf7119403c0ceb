//! New-order alerts
//!
//! [`NotificationController`] owns the alert lifecycle for one kitchen feed:
//! `trigger` raises sound, banner and OS alert through an [`AlertSink`] and
//! arms an auto-clear timer; `dispose` tears everything down. There is no
//! global audio or title state.

use parking_lot::Mutex;
use shared::money::format_money;
use shared::order::Order;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Output surface for alerts
pub trait AlertSink: Send + Sync {
    fn play_sound(&self);
    fn show_banner(&self, order: &Order);
    fn notify_os(&self, order: &Order);
    /// Remove the banner and stop the sound
    fn clear(&self);
}

/// One-line alert text, e.g. `Novo pedido #12 - Ana (Delivery) R$ 21,00`
pub fn alert_text(order: &Order) -> String {
    format!(
        "Novo pedido #{} - {} ({}) {}",
        order.display_id(),
        order.customer.name.trim(),
        order.fulfillment.label(),
        format_money(order.total)
    )
}

/// Sink that writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn play_sound(&self) {
        tracing::debug!("Alert sound");
    }

    fn show_banner(&self, order: &Order) {
        tracing::info!(order_id = %order.display_id(), "{}", alert_text(order));
    }

    fn notify_os(&self, order: &Order) {
        tracing::debug!(order_id = %order.display_id(), items = order.item_count(), "OS notification");
    }

    fn clear(&self) {
        tracing::debug!("Alert cleared");
    }
}

#[derive(Default)]
struct AlertState {
    active_order: Option<String>,
    timer: Option<CancellationToken>,
    /// Bumped on every trigger so a stale timer cannot clear a newer alert
    generation: u64,
    disposed: bool,
}

/// Alert lifecycle owner
pub struct NotificationController {
    sink: Arc<dyn AlertSink>,
    duration: Duration,
    state: Arc<Mutex<AlertState>>,
}

impl NotificationController {
    pub fn new(sink: Arc<dyn AlertSink>, duration: Duration) -> Self {
        Self {
            sink,
            duration,
            state: Arc::new(Mutex::new(AlertState::default())),
        }
    }

    /// Raise an alert for a new order
    ///
    /// A pending auto-clear is replaced; the alert clears `duration` after
    /// the latest trigger regardless of polling.
    pub fn trigger(&self, order: &Order) {
        let (token, generation) = {
            let mut state = self.state.lock();
            if state.disposed {
                tracing::debug!(order_id = %order.display_id(), "Alert ignored after dispose");
                return;
            }
            if let Some(previous) = state.timer.take() {
                previous.cancel();
            }
            let token = CancellationToken::new();
            state.generation += 1;
            state.active_order = Some(order.display_id().to_string());
            state.timer = Some(token.clone());
            (token, state.generation)
        };

        self.sink.play_sound();
        self.sink.show_banner(order);
        self.sink.notify_os(order);
        tracing::info!(order_id = %order.display_id(), "New order alert");

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime; alert stays until dispose");
            return;
        };
        let state = self.state.clone();
        let sink = self.sink.clone();
        let duration = self.duration;
        handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    let cleared = {
                        let mut state = state.lock();
                        if state.generation == generation && !state.disposed {
                            state.active_order = None;
                            state.timer = None;
                            true
                        } else {
                            false
                        }
                    };
                    if cleared {
                        sink.clear();
                    }
                }
            }
        });
    }

    /// Whether an alert is currently shown
    pub fn is_active(&self) -> bool {
        self.state.lock().active_order.is_some()
    }

    pub fn active_order_id(&self) -> Option<String> {
        self.state.lock().active_order.clone()
    }

    /// Clear the current alert early (operator acknowledged it)
    pub fn acknowledge(&self) {
        self.clear_active(false);
    }

    /// Cancel pending timers, clear the alert and refuse further triggers
    pub fn dispose(&self) {
        self.clear_active(true);
        tracing::debug!("Notification controller disposed");
    }

    fn clear_active(&self, dispose: bool) {
        let was_active = {
            let mut state = self.state.lock();
            if dispose {
                state.disposed = true;
            }
            if let Some(timer) = state.timer.take() {
                timer.cancel();
            }
            state.active_order.take().is_some()
        };
        if was_active {
            self.sink.clear();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }
}

impl Drop for NotificationController {
    fn drop(&mut self) {
        if let Some(timer) = self.state.lock().timer.take() {
            timer.cancel();
        }
    }
}
