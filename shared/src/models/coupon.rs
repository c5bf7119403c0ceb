//! Coupon Model

use crate::money::{lenient, round_money, serde_money, serde_money_opt};
use crate::order::FulfillmentType;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Coupon eligibility tag
///
/// Restricts a coupon to a fulfillment type. Unrecognised tags are kept
/// verbatim and impose no restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CouponTag {
    PickupOnly,
    DeliveryOnly,
    DineInOnly,
    Other(String),
}

impl CouponTag {
    /// Parse a tag as written in the coupon sheet
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();
        match key.as_str() {
            "pickup-only" | "pickup" | "retirada" | "somente-retirada" | "apenas-retirada" => {
                Self::PickupOnly
            }
            "delivery-only" | "delivery" | "entrega" | "somente-delivery" | "apenas-delivery"
            | "somente-entrega" => Self::DeliveryOnly,
            "dine-in-only" | "dine-in" | "local" | "somente-local" | "apenas-local" => {
                Self::DineInOnly
            }
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// The single fulfillment type this tag restricts to, if any
    pub fn restricted_to(&self) -> Option<FulfillmentType> {
        match self {
            Self::PickupOnly => Some(FulfillmentType::Pickup),
            Self::DeliveryOnly => Some(FulfillmentType::Delivery),
            Self::DineInOnly => Some(FulfillmentType::DineIn),
            Self::Other(_) => None,
        }
    }
}

/// Whether a tag set permits the given fulfillment type.
///
/// Multiple restriction tags are combined as a union of allowed types.
pub fn tags_allow(tags: &[CouponTag], fulfillment: FulfillmentType) -> bool {
    let mut restrictions = tags.iter().filter_map(CouponTag::restricted_to).peekable();
    if restrictions.peek().is_none() {
        return true;
    }
    restrictions.any(|allowed| allowed == fulfillment)
}

/// Coupon description returned by `validarCupom`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CouponInfo {
    #[serde(rename = "codigo", alias = "code", default, deserialize_with = "lenient::string")]
    pub code: String,
    /// `percentual` | `fixo`
    #[serde(rename = "tipo", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(rename = "valor", default, with = "serde_money_opt")]
    pub value: Option<Decimal>,
    #[serde(
        rename = "tags",
        alias = "restricoes",
        alias = "restricao",
        default,
        deserialize_with = "deserialize_tags"
    )]
    pub tags: Vec<CouponTag>,
}

/// Tags arrive either as an array or as one comma-separated cell
fn deserialize_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<CouponTag>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let raw: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(lenient::string_from_value)
            .collect(),
        Value::String(s) => s.split([',', ';']).map(str::to_string).collect(),
        _ => Vec::new(),
    };
    Ok(raw
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| CouponTag::parse(s))
        .collect())
}

/// A validated coupon applied to a checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    /// Discount amount, `0 <= discount <= subtotal`
    #[serde(with = "serde_money")]
    pub discount: Decimal,
    #[serde(default)]
    pub eligibility: Vec<CouponTag>,
}

impl Coupon {
    /// Build a coupon whose discount is clamped into `[0, subtotal]`
    pub fn clamped(
        code: impl Into<String>,
        discount: Decimal,
        subtotal: Decimal,
        eligibility: Vec<CouponTag>,
    ) -> Self {
        Self {
            code: code.into(),
            discount: clamp_discount(discount, subtotal),
            eligibility,
        }
    }

    /// Discount re-clamped against a (possibly changed) subtotal
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        clamp_discount(self.discount, subtotal)
    }

    pub fn allows(&self, fulfillment: FulfillmentType) -> bool {
        tags_allow(&self.eligibility, fulfillment)
    }
}

/// Clamp a discount so the discounted subtotal never drops below zero
pub fn clamp_discount(discount: Decimal, subtotal: Decimal) -> Decimal {
    let ceiling = subtotal.max(Decimal::ZERO);
    round_money(discount.max(Decimal::ZERO).min(ceiling))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_parse() {
        assert_eq!(CouponTag::parse("pickup-only"), CouponTag::PickupOnly);
        assert_eq!(CouponTag::parse("Somente Retirada"), CouponTag::PickupOnly);
        assert_eq!(CouponTag::parse("DELIVERY_ONLY"), CouponTag::DeliveryOnly);
        assert_eq!(CouponTag::parse("local"), CouponTag::DineInOnly);
        assert_eq!(
            CouponTag::parse("primeira-compra"),
            CouponTag::Other("primeira-compra".into())
        );
    }

    #[test]
    fn test_tags_allow() {
        assert!(tags_allow(&[], FulfillmentType::Delivery));
        assert!(tags_allow(
            &[CouponTag::Other("vip".into())],
            FulfillmentType::Delivery
        ));
        assert!(!tags_allow(&[CouponTag::PickupOnly], FulfillmentType::Delivery));
        assert!(tags_allow(&[CouponTag::PickupOnly], FulfillmentType::Pickup));
        assert!(tags_allow(
            &[CouponTag::PickupOnly, CouponTag::DineInOnly],
            FulfillmentType::DineIn
        ));
    }

    #[test]
    fn test_clamp_discount() {
        let subtotal = Decimal::new(2000, 2);
        assert_eq!(clamp_discount(Decimal::new(500, 2), subtotal), Decimal::new(500, 2));
        assert_eq!(clamp_discount(Decimal::new(9900, 2), subtotal), subtotal);
        assert_eq!(clamp_discount(Decimal::new(-1, 0), subtotal), Decimal::ZERO);
        assert_eq!(clamp_discount(Decimal::ONE, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_coupon_info_tags_from_cell() {
        let json = r#"{"codigo": "CAFE10", "tipo": "percentual", "valor": "10", "tags": "retirada, local"}"#;
        let info: CouponInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.code, "CAFE10");
        assert_eq!(info.value, Some(Decimal::new(10, 0)));
        assert_eq!(info.tags, vec![CouponTag::PickupOnly, CouponTag::DineInOnly]);
    }
}
