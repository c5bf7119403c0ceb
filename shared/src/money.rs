//! Money calculation utilities using rust_decimal for precision
//!
//! Every amount in the ordering pipeline is a `Decimal` rounded to cents
//! (half away from zero) at each computed boundary. Amounts travel over the
//! wire as JSON numbers, but the spreadsheet backend is loose about types, so
//! the deserializers here also accept strings such as `"5,00"` or `"R$ 5.00"`.

use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Rounding strategy for monetary values (2 decimal places, half-up)
pub const DECIMAL_PLACES: u32 = 2;

/// Currency symbol used in customer-facing text
pub const CURRENCY_SYMBOL: &str = "R$";

/// Round a monetary value to cents
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert f64 to Decimal (NaN and infinities become zero)
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for serialization, rounded to cents
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Format an amount for display, e.g. `R$ 21,00`
pub fn format_money(value: Decimal) -> String {
    let rounded = round_money(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    format!("{}{} {}", sign, CURRENCY_SYMBOL, text.replace('.', ","))
}

/// Parse a loosely formatted amount
///
/// Accepts `5`, `5.5`, `5,50`, `R$ 1.234,56` and `1,234.56`.
pub fn parse_money(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .trim_start_matches(CURRENCY_SYMBOL)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Both separators: whichever comes last is the decimal separator
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}

/// Extract a decimal from an arbitrary JSON value
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => parse_money(s),
        _ => None,
    }
}

/// Serde adapter: serialize as a JSON number, deserialize leniently.
///
/// Unparseable input becomes zero.
pub mod serde_money {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_f64(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(decimal_from_value(&value).unwrap_or_default())
    }
}

/// Serde adapter for optional amounts
pub mod serde_money_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&to_f64(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(decimal_from_value(&value))
    }
}

/// Lenient scalar deserializers for spreadsheet-backed records
pub mod lenient {
    use super::*;

    /// Accept a string or a number as a string
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(string_from_value(&value).unwrap_or_default())
    }

    /// Optional variant of [`string`]; blank strings become `None`
    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(string_from_value(&value).filter(|s| !s.trim().is_empty()))
    }

    /// Accept `12`, `12.0` or `"12"`
    pub fn opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match &value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
                .and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Accept `1`, `u32` numbers or numeric strings; anything else is zero
    pub fn u32_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        opt_u32(deserializer).map(Option::unwrap_or_default)
    }

    /// Accept booleans, `"TRUE"`/`"sim"`/`"1"` style strings and 0/1 numbers.
    /// Missing or unrecognised values count as `true`.
    pub fn bool_default_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(bool_from_value(&value).unwrap_or(true))
    }

    /// Same as [`bool_default_true`] but defaulting to `false`
    pub fn bool_default_false<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(bool_from_value(&value).unwrap_or(false))
    }

    pub(crate) fn string_from_value(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub(crate) fn bool_from_value(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "sim" | "yes" | "1" | "ativo" | "s" => Some(true),
                "false" | "nao" | "não" | "no" | "0" | "inativo" | "n" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("1.004")), dec("1.00"));
        assert_eq!(round_money(dec("-1.005")), dec("-1.01"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec("21")), "R$ 21,00");
        assert_eq!(format_money(dec("5.5")), "R$ 5,50");
        assert_eq!(format_money(dec("-2.1")), "-R$ 2,10");
        assert_eq!(format_money(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn test_parse_money_variants() {
        assert_eq!(parse_money("5"), Some(dec("5")));
        assert_eq!(parse_money("5,50"), Some(dec("5.50")));
        assert_eq!(parse_money(" R$ 7.25 "), Some(dec("7.25")));
        assert_eq!(parse_money("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_money("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_money("abc"), None);
        assert_eq!(parse_money(""), None);
    }

    #[test]
    fn test_serde_money_accepts_strings_and_numbers() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(with = "serde_money")]
            fee: Decimal,
        }

        let row: Row = serde_json::from_str(r#"{"fee": "6,50"}"#).unwrap();
        assert_eq!(row.fee, dec("6.50"));
        let row: Row = serde_json::from_str(r#"{"fee": 4.75}"#).unwrap();
        assert_eq!(row.fee, dec("4.75"));
        let row: Row = serde_json::from_str(r#"{"fee": null}"#).unwrap();
        assert_eq!(row.fee, Decimal::ZERO);
    }

    #[test]
    fn test_lenient_bool() {
        use lenient::bool_from_value;
        assert_eq!(bool_from_value(&Value::String("TRUE".into())), Some(true));
        assert_eq!(bool_from_value(&Value::String("não".into())), Some(false));
        assert_eq!(bool_from_value(&serde_json::json!(0)), Some(false));
        assert_eq!(bool_from_value(&Value::Null), None);
    }
}
