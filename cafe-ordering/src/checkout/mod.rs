//! Order Submitter
//!
//! Composes the cart with the coupon and zone outputs into the canonical
//! order, submits it once (no automatic retry) and, for opted-in pickup or
//! delivery orders, hands the summary to the notification dispatcher.

mod payload;

pub use payload::{CheckoutDetails, build_payload};

use crate::cart::{CartLedger, LocalStorage};
use crate::delivery::ZoneResolution;
use crate::error::{OrderingError, OrderingResult};
use crate::notify::{DeliveryOutcome, LinkOpener, NotificationDispatcher, compose_message};
use cafe_client::RemoteStore;
use shared::models::Coupon;
use shared::order::Order;

/// A successfully submitted order
#[derive(Debug)]
pub struct SubmittedOrder {
    /// Order as stored, with the store-assigned id
    pub order: Order,
    /// Notification attempt, when one was made
    pub notification: Option<DeliveryOutcome>,
}

impl SubmittedOrder {
    pub fn order_id(&self) -> &str {
        self.order.display_id()
    }
}

/// Order submitter
pub struct OrderSubmitter<R, O> {
    store: R,
    dispatcher: NotificationDispatcher<O>,
    /// Number that receives order summaries
    notify_phone: String,
}

impl<R: RemoteStore, O: LinkOpener> OrderSubmitter<R, O> {
    pub fn new(store: R, dispatcher: NotificationDispatcher<O>, notify_phone: impl Into<String>) -> Self {
        Self {
            store,
            dispatcher,
            notify_phone: notify_phone.into(),
        }
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher<O> {
        &self.dispatcher
    }

    /// Submit a built order (`salvarPedido`); returns the assigned id
    pub async fn submit(&self, order: &Order) -> OrderingResult<String> {
        let response = self.store.save_order(order).await?;
        if !response.success {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "O pedido não foi aceito".to_string());
            tracing::warn!(reason = %message, "Order rejected by store");
            return Err(OrderingError::Rejected(message));
        }

        let id = response.order_id.unwrap_or_default();
        tracing::info!(
            order_id = %id,
            fulfillment = order.fulfillment.label(),
            total = %order.total,
            items = order.items.len(),
            "Order submitted"
        );
        Ok(id)
    }

    /// Submit and, when eligible, notify
    ///
    /// Only pickup and delivery orders with customer opt-in notify; dine-in
    /// never does. A blocked link does not fail the submission.
    pub async fn submit_and_notify(
        &self,
        mut order: Order,
        notify_opt_in: bool,
    ) -> OrderingResult<SubmittedOrder> {
        let id = self.submit(&order).await?;
        if !id.is_empty() {
            order.id = Some(id);
        }

        let notification = if order.fulfillment.notifies_customer() && notify_opt_in {
            let message = compose_message(&order);
            Some(self.dispatcher.deliver(&message, &self.notify_phone))
        } else {
            None
        };

        Ok(SubmittedOrder {
            order,
            notification,
        })
    }

    /// Full checkout: build, submit, notify, then clear the cart
    ///
    /// On any failure the cart is left untouched for a manual retry.
    pub async fn place_order<S: LocalStorage>(
        &self,
        cart: &mut CartLedger<S>,
        details: &CheckoutDetails,
        coupon: Option<&Coupon>,
        zone: Option<&ZoneResolution>,
    ) -> OrderingResult<SubmittedOrder> {
        let order = build_payload(cart.items(), details, coupon, zone)?;
        let submitted = self.submit_and_notify(order, details.notify_opt_in).await?;
        cart.clear();
        Ok(submitted)
    }
}
