//! Order status state machine
//!
//! `Received -> Preparing -> Ready -> Delivered` (terminal). Transitions are
//! operator-driven and strictly forward, one step at a time.

use super::types::fold_key;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Kitchen order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Received,
    Preparing,
    Ready,
    Delivered,
}

impl OrderStatus {
    /// All statuses in lifecycle order
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Received,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    /// Wire value written to the order sheet
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "Recebido",
            OrderStatus::Preparing => "Em preparo",
            OrderStatus::Ready => "Pronto",
            OrderStatus::Delivered => "Entregue",
        }
    }

    /// Label for the operator's action button that leads into this status
    pub fn action_label(&self) -> &'static str {
        match self {
            OrderStatus::Received => "Receber",
            OrderStatus::Preparing => "Iniciar preparo",
            OrderStatus::Ready => "Marcar pronto",
            OrderStatus::Delivered => "Marcar entregue",
        }
    }

    /// The single forward transition available from this status
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Received => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }

    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognised status strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_key(s).as_str() {
            "recebido" | "received" | "novo" | "new" | "pendente" | "pending" => {
                Ok(OrderStatus::Received)
            }
            "empreparo" | "preparando" | "preparing" | "preparo" => Ok(OrderStatus::Preparing),
            "pronto" | "ready" => Ok(OrderStatus::Ready),
            "entregue" | "delivered" | "finalizado" | "concluido" => Ok(OrderStatus::Delivered),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    /// Blank or unknown values fall back to `Received` so a malformed row is
    /// still shown to the kitchen instead of failing the whole order list.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(OrderStatus::Received);
        }
        Ok(raw.parse().unwrap_or_else(|e: UnknownStatus| {
            tracing::warn!(status = %e.0, "Unknown order status, treating as received");
            OrderStatus::Received
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_chain() {
        assert_eq!(OrderStatus::Received.next(), Some(OrderStatus::Preparing));
        assert_eq!(OrderStatus::Preparing.next(), Some(OrderStatus::Ready));
        assert_eq!(OrderStatus::Ready.next(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.next(), None);
        assert!(OrderStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_no_backward_or_skipping_transitions() {
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Received.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Received));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Ready));
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("Em Preparo".parse::<OrderStatus>().unwrap(), OrderStatus::Preparing);
        assert_eq!("READY".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        assert_eq!("Concluído".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
        assert!("cancelado".parse::<OrderStatus>().is_err());

        let json = serde_json::to_string(&OrderStatus::Delivered).unwrap();
        assert_eq!(json, "\"Entregue\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::Delivered);

        let fallback: OrderStatus = serde_json::from_str("\"???\"").unwrap();
        assert_eq!(fallback, OrderStatus::Received);
        let null: OrderStatus = serde_json::from_str("null").unwrap();
        assert_eq!(null, OrderStatus::Received);
    }
}
