//! Delivery Zone Model

use crate::money::{lenient, serde_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Delivery zone (bairro) as stored in the `getBairros` sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryZone {
    /// Neighborhood name as typed by the operator
    #[serde(rename = "Bairro", alias = "bairro", deserialize_with = "lenient::string")]
    pub name: String,
    /// Delivery fee
    #[serde(rename = "taxa_entrega", default, with = "serde_money")]
    pub fee: Decimal,
    /// Minimum ETA in minutes
    #[serde(rename = "tempo_min", default, deserialize_with = "lenient::u32_or_zero")]
    pub eta_min_minutes: u32,
    /// Maximum ETA in minutes
    #[serde(rename = "tempo_max", default, deserialize_with = "lenient::u32_or_zero")]
    pub eta_max_minutes: u32,
    #[serde(
        rename = "ativo",
        default = "default_active",
        deserialize_with = "lenient::bool_default_true"
    )]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl DeliveryZone {
    pub fn new(name: impl Into<String>, fee: Decimal, eta_min: u32, eta_max: u32) -> Self {
        Self {
            name: name.into(),
            fee,
            eta_min_minutes: eta_min,
            eta_max_minutes: eta_max,
            active: true,
        }
    }

    /// Mark the zone inactive (builder style)
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// ETA range for display, e.g. `30-45 min`
    pub fn eta_label(&self) -> String {
        format_eta(self.eta_min_minutes, self.eta_max_minutes)
    }
}

/// Format an ETA range; collapses equal or missing bounds
pub fn format_eta(min: u32, max: u32) -> String {
    match (min, max) {
        (0, 0) => String::new(),
        (m, 0) | (0, m) => format!("{} min", m),
        (a, b) if a == b => format!("{} min", a),
        (a, b) => format!("{}-{} min", a.min(b), a.max(b)),
    }
}
