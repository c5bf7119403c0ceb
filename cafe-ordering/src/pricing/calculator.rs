//! Price Calculator

use crate::error::ValidationError;
use rust_decimal::Decimal;
use shared::models::{Product, SelectedOptions};
use shared::money::round_money;

/// Check a selection against the product definition
///
/// - the product must be available
/// - every required group needs a selection
/// - every selected group and option must exist
pub fn validate_selection(
    product: &Product,
    selected: &SelectedOptions,
) -> Result<(), ValidationError> {
    if !product.available {
        return Err(ValidationError::ProductUnavailable(product.name.clone()));
    }

    for (group_id, option_id) in selected {
        let group = product
            .group(group_id)
            .ok_or_else(|| ValidationError::UnknownOptionGroup(group_id.clone()))?;
        if group.option(option_id).is_none() {
            return Err(ValidationError::UnknownOption {
                group: group.label.clone(),
                option: option_id.clone(),
            });
        }
    }

    if let Some(missing) = product
        .option_groups
        .iter()
        .find(|g| g.required && !selected.contains_key(&g.id))
    {
        return Err(ValidationError::MissingRequiredOption(missing.label.clone()));
    }

    Ok(())
}

/// `base_price + Σ surcharge(selected option in each group)`
///
/// Selections that do not resolve to an option contribute nothing; callers
/// reject those beforehand with [`validate_selection`].
pub fn unit_price(product: &Product, selected: &SelectedOptions) -> Decimal {
    let surcharges: Decimal = selected
        .iter()
        .filter_map(|(group_id, option_id)| product.group(group_id)?.option(option_id))
        .map(|option| option.surcharge)
        .sum();
    round_money(product.base_price + surcharges)
}

/// `round(unit_price * quantity, 2)`
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    round_money(unit_price * Decimal::from(quantity))
}

/// Flatten a selection into `Group: Option` labels, in the product's group order
pub fn option_labels(product: &Product, selected: &SelectedOptions) -> Vec<String> {
    product
        .option_groups
        .iter()
        .filter_map(|group| {
            let option = group.option(selected.get(&group.id)?)?;
            Some(format!("{}: {}", group.label, option.label))
        })
        .collect()
}
