//! Shared order types

use crate::money::{lenient, serde_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

// ============================================================================
// Fulfillment Type
// ============================================================================

/// How the order is handed to the customer
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum FulfillmentType {
    #[default]
    #[serde(rename = "local")]
    DineIn,
    #[serde(rename = "retirada")]
    Pickup,
    #[serde(rename = "delivery")]
    Delivery,
}

impl FulfillmentType {
    pub fn label(&self) -> &'static str {
        match self {
            FulfillmentType::DineIn => "Consumo no local",
            FulfillmentType::Pickup => "Retirada",
            FulfillmentType::Delivery => "Delivery",
        }
    }

    /// Whether orders of this type may trigger an external notification
    pub fn notifies_customer(&self) -> bool {
        !matches!(self, FulfillmentType::DineIn)
    }
}

impl fmt::Display for FulfillmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FulfillmentType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_key(s).as_str() {
            "local" | "dinein" | "mesa" | "consumonolocal" => Ok(FulfillmentType::DineIn),
            "retirada" | "retirar" | "pickup" | "takeout" => Ok(FulfillmentType::Pickup),
            "delivery" | "entrega" => Ok(FulfillmentType::Delivery),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for FulfillmentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_enum(deserializer, "fulfillment type")
    }
}

// ============================================================================
// Payment
// ============================================================================

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "dinheiro")]
    Cash,
    #[serde(rename = "credito")]
    CreditCard,
    #[serde(rename = "debito")]
    DebitCard,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "Pix",
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::CreditCard => "Cartão de crédito",
            PaymentMethod::DebitCard => "Cartão de débito",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_key(s).as_str() {
            "pix" => Ok(PaymentMethod::Pix),
            "dinheiro" | "cash" | "especie" => Ok(PaymentMethod::Cash),
            "credito" | "credit" | "cartao" | "cartaodecredito" | "creditcard" => {
                Ok(PaymentMethod::CreditCard)
            }
            "debito" | "debit" | "cartaodedebito" | "debitcard" => Ok(PaymentMethod::DebitCard),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_enum(deserializer, "payment method")
    }
}

// ============================================================================
// Lenient enum parsing
// ============================================================================

/// Error for unrecognised enum cells
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

/// Comparison key for free-text sheet cells: accents stripped, lowercase,
/// alphanumerics only (`"Cartão de Crédito"` -> `"cartaodecredito"`)
pub(crate) fn fold_key(raw: &str) -> String {
    raw.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Blank or unknown cells fall back to the default with a warning, so one
/// odd row never fails the whole order list.
fn lenient_enum<'de, D, T>(deserializer: D, what: &'static str) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = UnknownValue> + Default,
{
    let value = Value::deserialize(deserializer)?;
    let Some(raw) = lenient::string_from_value(&value) else {
        return Ok(T::default());
    };
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(raw.parse().unwrap_or_else(|e: UnknownValue| {
        tracing::warn!(value = %e.0, field = what, "Unknown value in order row, using default");
        T::default()
    }))
}

// ============================================================================
// Customer
// ============================================================================

/// Customer details captured at checkout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(rename = "nome", default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(
        rename = "telefone",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub phone: Option<String>,
    #[serde(
        rename = "rua",
        alias = "endereco",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub street: Option<String>,
    #[serde(
        rename = "numero",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub number: Option<String>,
    #[serde(
        rename = "complemento",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub complement: Option<String>,
    #[serde(
        rename = "bairro",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub neighborhood: Option<String>,
    #[serde(
        rename = "referencia",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub reference: Option<String>,
    /// Table label for dine-in orders
    #[serde(
        rename = "mesa",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub table: Option<String>,
}

impl CustomerInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// First missing delivery address field, if any
    pub fn missing_address_field(&self) -> Option<&'static str> {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().map(str::trim).unwrap_or_default().is_empty()
        }
        if blank(&self.street) {
            Some("rua")
        } else if blank(&self.number) {
            Some("número")
        } else if blank(&self.neighborhood) {
            Some("bairro")
        } else {
            None
        }
    }

    /// Single-line address, e.g. `Rua A, 10 - Apto 2`
    pub fn address_line(&self) -> String {
        let mut line = self.street.clone().unwrap_or_default();
        if let Some(number) = &self.number {
            line.push_str(", ");
            line.push_str(number);
        }
        if let Some(complement) = &self.complement {
            line.push_str(" - ");
            line.push_str(complement);
        }
        line
    }
}

// ============================================================================
// Item Snapshot
// ============================================================================

/// Denormalized item as frozen into a submitted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemSnapshot {
    #[serde(
        rename = "produto_id",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub product_id: Option<String>,
    #[serde(rename = "nome", default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(rename = "quantidade", default, deserialize_with = "lenient::u32_or_zero")]
    pub quantity: u32,
    #[serde(rename = "preco_unitario", default, with = "serde_money")]
    pub unit_price: Decimal,
    #[serde(rename = "total", default, with = "serde_money")]
    pub line_total: Decimal,
    /// Flattened option labels, e.g. `Tamanho: Grande`
    #[serde(rename = "opcoes", default, deserialize_with = "deserialize_labels")]
    pub options: Vec<String>,
    #[serde(
        rename = "observacao",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub note: Option<String>,
}

fn deserialize_labels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .filter_map(lenient::string_from_value)
            .collect(),
        Value::String(s) if !s.trim().is_empty() => {
            s.split(',').map(|p| p.trim().to_string()).collect()
        }
        _ => Vec::new(),
    })
}

/// Normalize an `itens` value into a typed item list.
///
/// The order sheet stores items either as a JSON-encoded string or as an
/// already decoded array. Anything unparseable yields an empty list.
pub fn parse_items(value: &Value) -> Vec<OrderItemSnapshot> {
    let parsed = match value {
        Value::String(s) => serde_json::from_str::<Vec<OrderItemSnapshot>>(s),
        Value::Array(_) => serde_json::from_value::<Vec<OrderItemSnapshot>>(value.clone()),
        Value::Null => return Vec::new(),
        _ => {
            tracing::warn!("Order items field has unexpected JSON type, using empty list");
            return Vec::new();
        }
    };
    parsed.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to parse order items, using empty list");
        Vec::new()
    })
}

/// Serde adapter for the `itens` field
pub fn deserialize_items<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<OrderItemSnapshot>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(parse_items(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_items_from_encoded_string() {
        let raw = json!(r#"[{"nome":"Espresso","quantidade":2,"preco_unitario":5.5,"total":11,"opcoes":[]}]"#);
        let items = parse_items(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Espresso");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].line_total, Decimal::new(11, 0));
    }

    #[test]
    fn test_items_from_decoded_array() {
        let raw = json!([{"nome": "Latte", "quantidade": "1", "preco_unitario": "10,00",
                          "total": 10, "opcoes": "Tamanho: Grande"}]);
        let items = parse_items(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, Decimal::new(1000, 2));
        assert_eq!(items[0].options, vec!["Tamanho: Grande".to_string()]);
    }

    #[test]
    fn test_items_garbage_is_empty() {
        assert!(parse_items(&json!("not json")).is_empty());
        assert!(parse_items(&json!(42)).is_empty());
        assert!(parse_items(&Value::Null).is_empty());
        assert!(parse_items(&json!("{\"nome\": 1}")).is_empty());
    }

    #[test]
    fn test_fulfillment_wire_names() {
        assert_eq!(serde_json::to_string(&FulfillmentType::Pickup).unwrap(), "\"retirada\"");
        let t: FulfillmentType = serde_json::from_str("\"dine-in\"").unwrap();
        assert_eq!(t, FulfillmentType::DineIn);
        assert!(!FulfillmentType::DineIn.notifies_customer());
        assert!(FulfillmentType::Delivery.notifies_customer());
    }

    #[test]
    fn test_enum_cells_ignore_case_and_accents() {
        let t: FulfillmentType = serde_json::from_str("\" Retirada \"").unwrap();
        assert_eq!(t, FulfillmentType::Pickup);
        let t: FulfillmentType = serde_json::from_str("\"Consumo no Local\"").unwrap();
        assert_eq!(t, FulfillmentType::DineIn);

        let p: PaymentMethod = serde_json::from_str("\"Cartão de Débito\"").unwrap();
        assert_eq!(p, PaymentMethod::DebitCard);
        let p: PaymentMethod = serde_json::from_str("\"DINHEIRO\"").unwrap();
        assert_eq!(p, PaymentMethod::Cash);

        assert!("boleto".parse::<PaymentMethod>().is_err());
        let p: PaymentMethod = serde_json::from_str("\"boleto\"").unwrap();
        assert_eq!(p, PaymentMethod::Pix);
        let p: PaymentMethod = serde_json::from_str("null").unwrap();
        assert_eq!(p, PaymentMethod::Pix);
    }

    #[test]
    fn test_missing_address_field() {
        let mut customer = CustomerInfo::new("Ana");
        assert_eq!(customer.missing_address_field(), Some("rua"));
        customer.street = Some("Rua das Flores".into());
        customer.number = Some("  ".into());
        assert_eq!(customer.missing_address_field(), Some("número"));
        customer.number = Some("10".into());
        customer.neighborhood = Some("Centro".into());
        assert_eq!(customer.missing_address_field(), None);
        assert_eq!(customer.address_line(), "Rua das Flores, 10");
    }
}
