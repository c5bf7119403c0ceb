//! Gateway DTOs shared between the gateway client and its consumers
//!
//! The remote store is a spreadsheet behind a single action-dispatch
//! endpoint: `GET/POST /api?action=<name>` with JSON bodies.

use crate::models::{CouponInfo, DeliveryZone};
use crate::money::{lenient, serde_money, serde_money_opt};
use crate::order::{Order, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Actions
// =============================================================================

/// Gateway action names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiAction {
    /// Delivery zone table
    GetBairros,
    /// Full order list
    GetPedidos,
    /// Persist a new order
    SalvarPedido,
    /// Change an order's status
    AtualizarStatus,
    /// Validate a coupon code
    ValidarCupom,
}

impl ApiAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiAction::GetBairros => "getBairros",
            ApiAction::GetPedidos => "getPedidos",
            ApiAction::SalvarPedido => "salvarPedido",
            ApiAction::AtualizarStatus => "atualizarStatus",
            ApiAction::ValidarCupom => "validarCupom",
        }
    }
}

impl fmt::Display for ApiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// getBairros / getPedidos
// =============================================================================

/// `getBairros` returns a bare array of zone rows
pub type ZonesResponse = Vec<DeliveryZone>;

/// `getPedidos` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    #[serde(default, deserialize_with = "lenient::bool_default_false")]
    pub success: bool,
    #[serde(rename = "pedidos", default)]
    pub orders: Vec<Order>,
    #[serde(default, alias = "message", deserialize_with = "lenient::opt_string")]
    pub error: Option<String>,
}

// =============================================================================
// salvarPedido
// =============================================================================

/// `salvarPedido` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveOrderResponse {
    #[serde(default, deserialize_with = "lenient::bool_default_false")]
    pub success: bool,
    #[serde(
        rename = "pedido_id",
        alias = "pedidoId",
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub order_id: Option<String>,
    #[serde(default, alias = "error", deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
}

// =============================================================================
// atualizarStatus
// =============================================================================

/// `atualizarStatus` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(rename = "pedidoId")]
    pub order_id: String,
    #[serde(rename = "novoStatus")]
    pub new_status: OrderStatus,
}

/// `atualizarStatus` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    #[serde(default, deserialize_with = "lenient::bool_default_false")]
    pub success: bool,
    #[serde(default, alias = "message", deserialize_with = "lenient::opt_string")]
    pub error: Option<String>,
}

// =============================================================================
// validarCupom
// =============================================================================

/// `validarCupom` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponValidationRequest {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(with = "serde_money")]
    pub subtotal: Decimal,
}

/// `validarCupom` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CouponValidationResponse {
    #[serde(rename = "valido", default, deserialize_with = "lenient::bool_default_false")]
    pub valid: bool,
    /// Discount computed by the store for the given subtotal
    #[serde(rename = "valor_calculado", default, with = "serde_money_opt")]
    pub discount_amount: Option<Decimal>,
    #[serde(rename = "cupom", default)]
    pub coupon: Option<CouponInfo>,
    #[serde(rename = "mensagem", default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::order::{FulfillmentType, PaymentMethod};

    #[test]
    fn test_status_update_request_wire_names() {
        let req = StatusUpdateRequest {
            order_id: "12".into(),
            new_status: OrderStatus::Ready,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"pedidoId": "12", "novoStatus": "Pronto"}));
    }

    #[test]
    fn test_save_order_response_numeric_id() {
        let resp: SaveOrderResponse =
            serde_json::from_value(json!({"success": true, "pedido_id": 88})).unwrap();
        assert!(resp.success);
        assert_eq!(resp.order_id.as_deref(), Some("88"));

        let resp: SaveOrderResponse =
            serde_json::from_value(json!({"success": false, "message": "planilha cheia"})).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("planilha cheia"));
    }

    #[test]
    fn test_coupon_validation_response() {
        let resp: CouponValidationResponse = serde_json::from_value(json!({
            "valido": true,
            "valor_calculado": "2,10",
            "cupom": {"codigo": "CAFE10", "tags": ["pickup-only"]},
            "mensagem": "Cupom aplicado"
        }))
        .unwrap();
        assert!(resp.valid);
        assert_eq!(resp.discount_amount, Some(Decimal::new(210, 2)));
        assert_eq!(resp.coupon.unwrap().tags.len(), 1);
    }

    #[test]
    fn test_orders_response_keeps_rows_with_odd_enum_cells() {
        let resp: OrdersResponse = serde_json::from_value(json!({
            "success": true,
            "pedidos": [
                {"id": "1", "tipo": "retirada", "nome": "Ana", "forma_pagamento": "pix",
                 "status": "Recebido"},
                {"id": "2", "tipo": "Retirada", "nome": "Bia", "forma_pagamento": "Pix",
                 "status": "Em preparo"},
                {"id": "3", "tipo": "ENTREGA", "nome": "Caio", "forma_pagamento": "Cartão",
                 "status": "Pronto"},
                {"id": "4", "tipo": "???", "nome": "Davi", "forma_pagamento": "",
                 "status": "Recebido"}
            ]
        }))
        .unwrap();

        assert_eq!(resp.orders.len(), 4);
        assert_eq!(resp.orders[1].fulfillment, FulfillmentType::Pickup);
        assert_eq!(resp.orders[1].payment_method, PaymentMethod::Pix);
        assert_eq!(resp.orders[2].fulfillment, FulfillmentType::Delivery);
        assert_eq!(resp.orders[2].payment_method, PaymentMethod::CreditCard);
        assert_eq!(resp.orders[3].fulfillment, FulfillmentType::default());
        assert_eq!(resp.orders[3].payment_method, PaymentMethod::default());
    }

    #[test]
    fn test_action_names() {
        assert_eq!(ApiAction::GetBairros.as_str(), "getBairros");
        assert_eq!(ApiAction::AtualizarStatus.to_string(), "atualizarStatus");
    }
}
