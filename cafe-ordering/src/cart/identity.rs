//! Content-addressed cart item identity

use sha2::{Digest, Sha256};
use shared::models::SelectedOptions;

/// Generate a content-addressed instance id for a cart line
///
/// The id hashes the item's identity-defining properties:
/// - product id
/// - selected options (group id + option id, in stable key order)
/// - note (trimmed; empty and absent are the same)
///
/// Lines with the same instance id are merged (quantities added together).
/// Quantity and price are not part of the identity.
pub fn generate_instance_id(
    product_id: &str,
    selected: &SelectedOptions,
    note: Option<&str>,
) -> String {
    let mut hasher = Sha256::new();

    // Length-prefix every field so ("ab","c") and ("a","bc") differ
    fn feed(hasher: &mut Sha256, value: &str) {
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value.as_bytes());
    }

    feed(&mut hasher, product_id);

    hasher.update((selected.len() as u64).to_le_bytes());
    for (group_id, option_id) in selected {
        feed(&mut hasher, group_id);
        feed(&mut hasher, option_id);
    }

    feed(&mut hasher, note.map(str::trim).unwrap_or_default());

    let result = hasher.finalize();
    hex::encode(&result[..16]) // Use first 16 bytes for shorter ID
}
