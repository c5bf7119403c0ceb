//! HTTP gateway - network communication with the store
//!
//! Every call goes to the same endpoint with `?action=<name>`; reads are
//! GETs, writes are POSTs with a JSON body.

use crate::store::RemoteStore;
use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::Decimal;
use shared::client::{
    ApiAction, CouponValidationRequest, CouponValidationResponse, OrdersResponse,
    SaveOrderResponse, StatusUpdateRequest, StatusUpdateResponse, ZonesResponse,
};
use shared::models::DeliveryZone;
use shared::order::{Order, OrderStatus};

/// Network gateway client
#[derive(Debug, Clone)]
pub struct NetworkGateway {
    client: Client,
    endpoint: String,
}

impl NetworkGateway {
    /// Create a new gateway client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    /// Dispatch endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET `?action=<action>`
    pub async fn get_action<T: DeserializeOwned>(&self, action: ApiAction) -> ClientResult<T> {
        tracing::debug!(action = %action, "Gateway GET");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("action", action.as_str())])
            .send()
            .await?;
        Self::handle_response(action, response).await
    }

    /// POST `?action=<action>` with a JSON body
    pub async fn post_action<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        action: ApiAction,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(action = %action, "Gateway POST");
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("action", action.as_str())])
            .json(body)
            .send()
            .await?;
        Self::handle_response(action, response).await
    }

    /// Read the body as text first: script gateways often answer JSON with a
    /// `text/plain` content type.
    async fn handle_response<T: DeserializeOwned>(
        action: ApiAction,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(action = %action, status = %status, "Gateway returned error status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Err(ClientError::InvalidResponse(format!(
                "empty body for action {}",
                action
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(action = %action, error = %e, "Malformed gateway JSON");
            ClientError::Serialization(e)
        })
    }
}

#[async_trait]
impl RemoteStore for NetworkGateway {
    async fn fetch_zones(&self) -> ClientResult<Vec<DeliveryZone>> {
        self.get_action::<ZonesResponse>(ApiAction::GetBairros).await
    }

    async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        let resp: OrdersResponse = self.get_action(ApiAction::GetPedidos).await?;
        if !resp.success {
            return Err(ClientError::Rejected(
                resp.error.unwrap_or_else(|| "failed to load orders".into()),
            ));
        }
        Ok(resp.orders)
    }

    async fn save_order(&self, order: &Order) -> ClientResult<SaveOrderResponse> {
        self.post_action(ApiAction::SalvarPedido, order).await
    }

    async fn update_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()> {
        let req = StatusUpdateRequest {
            order_id: order_id.to_string(),
            new_status: status,
        };
        let resp: StatusUpdateResponse = self.post_action(ApiAction::AtualizarStatus, &req).await?;
        if !resp.success {
            return Err(ClientError::Rejected(
                resp.error.unwrap_or_else(|| "status update failed".into()),
            ));
        }
        Ok(())
    }

    async fn validate_coupon(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> ClientResult<CouponValidationResponse> {
        let req = CouponValidationRequest {
            code: code.to_string(),
            subtotal,
        };
        self.post_action(ApiAction::ValidarCupom, &req).await
    }
}
