//! Kitchen Feed
//!
//! Polls the order list, raises an alert for genuinely new orders and
//! drives the per-order status machine.
//!
//! # New-order detection
//!
//! Orders are sorted newest first. An alert fires only when the newest id
//! differs from the last one seen **and** that order is still `Received`.
//! The last-seen id is updated regardless of status, so later status
//! changes never re-fire. The first successful poll only records the
//! last-seen id.
//!
//! # Transitions
//!
//! One outstanding request per order (in-flight set); different orders are
//! independent. Nothing changes locally until the store confirms, after
//! which the feed re-polls. That re-poll waits for a scheduled poll that is
//! already running and then fetches again, so a list read before the write
//! landed never stays on screen.

use crate::alert::NotificationController;
use crate::error::{FeedError, FeedResult};
use cafe_client::RemoteStore;
use dashmap::DashSet;
use parking_lot::RwLock;
use shared::order::{FulfillmentType, Order, OrderStatus};
use tokio::sync::Mutex;

/// Which orders the operator is looking at
///
/// Rendering only: polling cadence and alerts ignore the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FulfillmentFilter {
    #[default]
    All,
    Only(FulfillmentType),
}

impl FulfillmentFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            FulfillmentFilter::All => true,
            FulfillmentFilter::Only(kind) => order.fulfillment == *kind,
        }
    }
}

/// Result of one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A previous poll was still running
    Skipped,
    Refreshed {
        total: usize,
        /// Id of the order that raised an alert
        new_order: Option<String>,
    },
}

#[derive(Debug, Default)]
struct FeedState {
    orders: Vec<Order>,
    primed: bool,
    last_seen_id: Option<String>,
    last_error: Option<String>,
}

/// Kitchen feed
pub struct KitchenFeed<R> {
    store: R,
    state: RwLock<FeedState>,
    in_flight: DashSet<String>,
    /// Held for the whole fetch-and-apply of one poll
    poll_lock: Mutex<()>,
    alerts: NotificationController,
}

impl<R: RemoteStore> KitchenFeed<R> {
    pub fn new(store: R, alerts: NotificationController) -> Self {
        Self {
            store,
            state: RwLock::new(FeedState::default()),
            in_flight: DashSet::new(),
            poll_lock: Mutex::new(()),
            alerts,
        }
    }

    // ========== Polling ==========

    /// Fetch the order list and check for a new order
    ///
    /// Returns [`PollOutcome::Skipped`] when another poll is in progress.
    pub async fn poll(&self) -> FeedResult<PollOutcome> {
        let Ok(_guard) = self.poll_lock.try_lock() else {
            tracing::debug!("Previous poll still running, skipping");
            return Ok(PollOutcome::Skipped);
        };
        self.fetch_and_apply().await
    }

    /// Poll after a running poll finishes, never skipping
    async fn refresh(&self) -> FeedResult<PollOutcome> {
        let _guard = self.poll_lock.lock().await;
        self.fetch_and_apply().await
    }

    async fn fetch_and_apply(&self) -> FeedResult<PollOutcome> {
        let mut orders = match self.store.fetch_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::warn!(error = %e, "Order poll failed");
                self.state.write().last_error = Some(e.user_message());
                return Err(FeedError::Transport(e));
            }
        };
        sort_newest_first(&mut orders);

        let new_order = {
            let mut state = self.state.write();
            let new_order = detect_new_order(&mut state, orders.first());
            state.orders = orders;
            state.last_error = None;
            new_order
        };

        let total = self.state.read().orders.len();
        if let Some(order) = &new_order {
            self.alerts.trigger(order);
        }
        tracing::debug!(total, new = new_order.is_some(), "Orders refreshed");

        Ok(PollOutcome::Refreshed {
            total,
            new_order: new_order.and_then(|o| o.id),
        })
    }

    // ========== Transitions ==========

    /// Move an order to its next status
    ///
    /// Only the single forward step from the displayed status is accepted.
    /// On failure the displayed status is left as it was.
    pub async fn transition(&self, order_id: &str, target: OrderStatus) -> FeedResult<()> {
        let current = self
            .order(order_id)
            .map(|o| o.status)
            .ok_or_else(|| FeedError::UnknownOrder(order_id.to_string()))?;
        if !current.can_transition_to(target) {
            return Err(FeedError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, order_id) else {
            tracing::debug!(order_id = %order_id, "Transition already in flight, ignoring");
            return Err(FeedError::TransitionInFlight(order_id.to_string()));
        };

        if let Err(e) = self.store.update_status(order_id, target).await {
            let reason = e.user_message();
            tracing::warn!(
                order_id = %order_id,
                from = %current,
                to = %target,
                error = %e,
                "Status transition failed"
            );
            self.state.write().last_error = Some(reason.clone());
            return Err(FeedError::TransitionFailure {
                order_id: order_id.to_string(),
                reason,
            });
        }

        tracing::info!(order_id = %order_id, from = %current, to = %target, "Order status changed");

        // Refresh from the store; the in-flight guard stays held until this returns
        if let Err(e) = self.refresh().await {
            tracing::warn!(order_id = %order_id, error = %e, "Re-poll after transition failed");
        }
        Ok(())
    }

    /// Advance an order one step (the operator's single action button)
    pub async fn advance(&self, order_id: &str) -> FeedResult<OrderStatus> {
        let current = self
            .order(order_id)
            .map(|o| o.status)
            .ok_or_else(|| FeedError::UnknownOrder(order_id.to_string()))?;
        let next = current.next().ok_or(FeedError::InvalidTransition {
            from: current,
            to: current,
        })?;
        self.transition(order_id, next).await?;
        Ok(next)
    }

    // ========== Queries ==========

    /// All orders, newest first
    pub fn orders(&self) -> Vec<Order> {
        self.state.read().orders.clone()
    }

    /// Orders matching a display filter, newest first
    pub fn visible_orders(&self, filter: FulfillmentFilter) -> Vec<Order> {
        self.state
            .read()
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect()
    }

    pub fn order(&self, order_id: &str) -> Option<Order> {
        self.state
            .read()
            .orders
            .iter()
            .find(|o| o.id.as_deref() == Some(order_id))
            .cloned()
    }

    /// Whether the order's action button should be disabled
    pub fn is_in_flight(&self, order_id: &str) -> bool {
        self.in_flight.contains(order_id)
    }

    /// Last poll or transition error, cleared by the next successful poll
    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    pub fn last_seen_id(&self) -> Option<String> {
        self.state.read().last_seen_id.clone()
    }

    pub fn alerts(&self) -> &NotificationController {
        &self.alerts
    }
}

/// Sort by timestamp, newest first; orders without one go last
fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Apply new-order detection to the newest order of a poll
fn detect_new_order(state: &mut FeedState, newest: Option<&Order>) -> Option<Order> {
    let first_poll = !state.primed;
    state.primed = true;

    let newest = newest?;
    let id = newest.id.as_deref()?;
    let changed = state.last_seen_id.as_deref() != Some(id);
    state.last_seen_id = Some(id.to_string());

    if changed && !first_poll && newest.status == OrderStatus::Received {
        Some(newest.clone())
    } else {
        None
    }
}

/// Per-order in-flight flag, released on drop
struct InFlightGuard<'a> {
    set: &'a DashSet<String>,
    order_id: String,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a DashSet<String>, order_id: &str) -> Option<Self> {
        set.insert(order_id.to_string()).then(|| Self {
            set,
            order_id: order_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.order_id);
    }
}
