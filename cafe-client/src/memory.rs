//! In-memory RemoteStore
//!
//! A scriptable stand-in for the gateway: order lists can be queued per
//! poll, status updates can be made to fail or stall, and every write is
//! recorded for inspection.

use crate::store::RemoteStore;
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::Decimal;
use shared::client::{CouponValidationResponse, SaveOrderResponse};
use shared::models::DeliveryZone;
use shared::order::{Order, OrderStatus};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

#[derive(Default)]
struct State {
    zones: Vec<DeliveryZone>,
    orders: Vec<Order>,
    /// Order lists handed out by successive `fetch_orders` calls
    scripted_polls: VecDeque<Vec<Order>>,
    coupons: HashMap<String, CouponValidationResponse>,
    saved: Vec<Order>,
    status_calls: Vec<(String, OrderStatus)>,
    next_id: u64,
    offline: bool,
    reject_saves: Option<String>,
    failing_status_updates: usize,
    status_delay: Option<Duration>,
    fetch_delay: Option<Duration>,
    fetch_count: usize,
}

/// In-memory store
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the zone table
    pub fn with_zones(self, zones: Vec<DeliveryZone>) -> Self {
        self.state.lock().zones = zones;
        self
    }

    /// Seed the order list
    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        self.state.lock().orders = orders;
        self
    }

    /// Register the verdict `validarCupom` returns for a code
    pub fn with_coupon(self, code: &str, response: CouponValidationResponse) -> Self {
        self.state
            .lock()
            .coupons
            .insert(code.to_uppercase(), response);
        self
    }

    /// Queue the order list returned by the next unscripted `fetch_orders`
    pub fn push_poll(&self, orders: Vec<Order>) {
        self.state.lock().scripted_polls.push_back(orders);
    }

    /// Replace the current order list
    pub fn set_orders(&self, orders: Vec<Order>) {
        self.state.lock().orders = orders;
    }

    /// Simulate a network outage for every call
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Make `salvarPedido` answer `success: false` with this message
    pub fn reject_saves(&self, message: Option<&str>) {
        self.state.lock().reject_saves = message.map(str::to_string);
    }

    /// Fail the next `count` status updates
    pub fn fail_next_status_updates(&self, count: usize) {
        self.state.lock().failing_status_updates = count;
    }

    /// Delay each status update (for in-flight tests)
    pub fn set_status_delay(&self, delay: Option<Duration>) {
        self.state.lock().status_delay = delay;
    }

    /// Delay each `fetch_orders` after the list is read, so the caller
    /// receives the list as it was when the call started
    pub fn set_fetch_delay(&self, delay: Option<Duration>) {
        self.state.lock().fetch_delay = delay;
    }

    /// Orders received through `salvarPedido`
    pub fn saved_orders(&self) -> Vec<Order> {
        self.state.lock().saved.clone()
    }

    /// Status updates received, in call order
    pub fn status_calls(&self) -> Vec<(String, OrderStatus)> {
        self.state.lock().status_calls.clone()
    }

    /// Number of `fetch_orders` calls served
    pub fn fetch_count(&self) -> usize {
        self.state.lock().fetch_count
    }

    fn check_online(&self) -> ClientResult<()> {
        if self.state.lock().offline {
            return Err(ClientError::Status {
                status: 503,
                body: "store offline".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn fetch_zones(&self) -> ClientResult<Vec<DeliveryZone>> {
        self.check_online()?;
        Ok(self.state.lock().zones.clone())
    }

    async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        self.check_online()?;
        let (orders, delay) = {
            let mut state = self.state.lock();
            state.fetch_count += 1;
            if let Some(next) = state.scripted_polls.pop_front() {
                state.orders = next;
            }
            (state.orders.clone(), state.fetch_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(orders)
    }

    async fn save_order(&self, order: &Order) -> ClientResult<SaveOrderResponse> {
        self.check_online()?;
        let mut state = self.state.lock();
        if let Some(message) = state.reject_saves.clone() {
            return Ok(SaveOrderResponse {
                success: false,
                order_id: None,
                message: Some(message),
            });
        }
        state.next_id += 1;
        let id = state.next_id.to_string();
        let mut stored = order.clone();
        stored.id = Some(id.clone());
        state.saved.push(stored.clone());
        state.orders.push(stored);
        Ok(SaveOrderResponse {
            success: true,
            order_id: Some(id),
            message: None,
        })
    }

    async fn update_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()> {
        self.check_online()?;
        let delay = self.state.lock().status_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        state.status_calls.push((order_id.to_string(), status));
        if state.failing_status_updates > 0 {
            state.failing_status_updates -= 1;
            return Err(ClientError::Rejected("status update failed".into()));
        }
        match state
            .orders
            .iter_mut()
            .find(|o| o.id.as_deref() == Some(order_id))
        {
            Some(order) => {
                order.status = status;
                Ok(())
            }
            None => Err(ClientError::Rejected(format!("order {} not found", order_id))),
        }
    }

    async fn validate_coupon(
        &self,
        code: &str,
        _subtotal: Decimal,
    ) -> ClientResult<CouponValidationResponse> {
        self.check_online()?;
        Ok(self
            .state
            .lock()
            .coupons
            .get(&code.trim().to_uppercase())
            .cloned()
            .unwrap_or_else(|| CouponValidationResponse {
                valid: false,
                message: Some("Cupom inválido".into()),
                ..Default::default()
            }))
    }
}
