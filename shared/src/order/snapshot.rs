//! Order record - the canonical order shape
//!
//! Built once by the ordering client at submission time (all totals frozen)
//! and read back by the kitchen feed from `getPedidos`. The remote store
//! assigns the id, so a freshly built order has none.

use super::status::OrderStatus;
use super::types::{CustomerInfo, FulfillmentType, OrderItemSnapshot, PaymentMethod, deserialize_items};
use crate::money::{lenient, serde_money, serde_money_opt};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Order record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order ID (assigned by the remote store)
    #[serde(
        rename = "id",
        alias = "pedido_id",
        alias = "pedidoId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub id: Option<String>,
    #[serde(rename = "tipo", default)]
    pub fulfillment: FulfillmentType,
    #[serde(flatten)]
    pub customer: CustomerInfo,
    #[serde(rename = "itens", default, deserialize_with = "deserialize_items")]
    pub items: Vec<OrderItemSnapshot>,
    #[serde(default, with = "serde_money")]
    pub subtotal: Decimal,
    #[serde(rename = "desconto", default, with = "serde_money")]
    pub discount: Decimal,
    #[serde(
        rename = "cupom",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub coupon_code: Option<String>,
    #[serde(rename = "taxa_entrega", default, with = "serde_money")]
    pub delivery_fee: Decimal,
    /// Matched delivery zone name
    #[serde(
        rename = "zona_entrega",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub delivery_zone: Option<String>,
    /// ETA range label for delivery orders
    #[serde(
        rename = "tempo_estimado",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub eta: Option<String>,
    #[serde(default, with = "serde_money")]
    pub total: Decimal,
    #[serde(rename = "forma_pagamento", default)]
    pub payment_method: PaymentMethod,
    /// Cash payments: amount the customer will pay with
    #[serde(
        rename = "troco_para",
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_money_opt"
    )]
    pub change_for: Option<Decimal>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(
        rename = "data_hora",
        alias = "timestamp",
        alias = "data",
        default,
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "observacoes",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub notes: Option<String>,
}

impl Order {
    /// Short id for headers and logs; `-` until the store assigns one
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("-")
    }

    /// Total item quantity
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

fn serialize_timestamp<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(parse_timestamp(&value))
}

/// Naive formats seen in spreadsheet exports, interpreted as UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse RFC 3339, common naive formats, or epoch milliseconds
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.with_timezone(&Utc));
            }
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}
