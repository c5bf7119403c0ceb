//! Product Model

use crate::money::{lenient, serde_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selected options: option group id -> option id.
///
/// A `BTreeMap` keeps keys in a stable order, so two selections with the
/// same pairs always compare, hash and serialize identically.
pub type SelectedOptions = BTreeMap<String, String>;

/// A single choice inside an option group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    pub label: String,
    /// Price surcharge in currency unit (>= 0)
    #[serde(default, with = "serde_money")]
    pub surcharge: Decimal,
}

impl ProductOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, surcharge: Decimal) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            surcharge: surcharge.max(Decimal::ZERO),
        }
    }
}

/// Option group (size, milk, extras, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionGroup {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    pub label: String,
    #[serde(default, deserialize_with = "lenient::bool_default_false")]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<ProductOption>,
}

impl OptionGroup {
    pub fn new(id: impl Into<String>, label: impl Into<String>, required: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required,
            options: Vec::new(),
        }
    }

    /// Append an option (builder style)
    pub fn with_option(mut self, option: ProductOption) -> Self {
        self.options.push(option);
        self
    }

    /// Find an option by id
    pub fn option(&self, option_id: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    pub name: String,
    #[serde(with = "serde_money")]
    pub base_price: Decimal,
    /// Ordered option groups
    #[serde(default)]
    pub option_groups: Vec<OptionGroup>,
    #[serde(default = "default_available", deserialize_with = "lenient::bool_default_true")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            option_groups: Vec::new(),
            available: true,
        }
    }

    /// Append an option group (builder style)
    pub fn with_group(mut self, group: OptionGroup) -> Self {
        self.option_groups.push(group);
        self
    }

    /// Mark the product as unavailable (builder style)
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Find an option group by id
    pub fn group(&self, group_id: &str) -> Option<&OptionGroup> {
        self.option_groups.iter().find(|g| g.id == group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_loose_json() {
        let json = r#"{
            "id": 12,
            "name": "Latte",
            "base_price": "8,00",
            "option_groups": [
                {"id": "size", "label": "Tamanho", "required": "TRUE",
                 "options": [{"id": "g", "label": "Grande", "surcharge": 2}]}
            ]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "12");
        assert_eq!(product.base_price, Decimal::new(800, 2));
        assert!(product.available);
        let group = product.group("size").unwrap();
        assert!(group.required);
        assert_eq!(group.option("g").unwrap().surcharge, Decimal::new(2, 0));
        assert!(group.option("x").is_none());
    }

    #[test]
    fn test_negative_surcharge_is_clamped() {
        let option = ProductOption::new("o", "Oat", Decimal::new(-1, 0));
        assert_eq!(option.surcharge, Decimal::ZERO);
    }
}
