//! RemoteStore trait - the seam between the core and the gateway

use crate::ClientResult;
use async_trait::async_trait;
use shared::Decimal;
use shared::client::{CouponValidationResponse, SaveOrderResponse};
use shared::models::DeliveryZone;
use shared::order::{Order, OrderStatus};
use std::sync::Arc;

/// Remote store operations consumed by the ordering and kitchen crates
///
/// Each method is one gateway round trip; none of them retry.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// `getBairros`
    async fn fetch_zones(&self) -> ClientResult<Vec<DeliveryZone>>;

    /// `getPedidos`; item lists are already normalized
    async fn fetch_orders(&self) -> ClientResult<Vec<Order>>;

    /// `salvarPedido`; the raw verdict is returned so callers can surface
    /// the store's own message on `success: false`
    async fn save_order(&self, order: &Order) -> ClientResult<SaveOrderResponse>;

    /// `atualizarStatus`; `success: false` maps to [`crate::ClientError::Rejected`]
    async fn update_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()>;

    /// `validarCupom`
    async fn validate_coupon(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> ClientResult<CouponValidationResponse>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    async fn fetch_zones(&self) -> ClientResult<Vec<DeliveryZone>> {
        (**self).fetch_zones().await
    }

    async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        (**self).fetch_orders().await
    }

    async fn save_order(&self, order: &Order) -> ClientResult<SaveOrderResponse> {
        (**self).save_order(order).await
    }

    async fn update_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()> {
        (**self).update_status(order_id, status).await
    }

    async fn validate_coupon(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> ClientResult<CouponValidationResponse> {
        (**self).validate_coupon(code, subtotal).await
    }
}
