//! Cart Ledger
//!
//! Owns the list of cart lines. Pricing goes through the pricing engine,
//! identical lines merge via their content-addressed instance id, and every
//! mutation writes a full snapshot to local storage.
//!
//! Persistence is best effort: a failed write is logged and the in-memory
//! cart stays authoritative. A corrupt snapshot on load is discarded and the
//! cart starts empty.

mod identity;
pub mod storage;

pub use identity::generate_instance_id;
pub use storage::{CART_STORAGE_KEY, FileStorage, LocalStorage, MemoryStorage};

use crate::error::ValidationError;
use crate::pricing;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Product, SelectedOptions};
use shared::money::{round_money, serde_money};

/// Snapshot format version
const SNAPSHOT_VERSION: u32 = 1;

/// A priced cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Content-addressed identity (product + options + note)
    pub instance_id: String,
    /// Product as it was when the line was added
    pub product: Product,
    /// Quantity (>= 1)
    pub quantity: u32,
    pub selected_options: SelectedOptions,
    pub note: Option<String>,
    #[serde(with = "serde_money")]
    pub unit_price: Decimal,
    /// `round(unit_price * quantity, 2)`
    #[serde(with = "serde_money")]
    pub line_total: Decimal,
}

impl CartItem {
    /// Flattened `Group: Option` labels
    pub fn option_labels(&self) -> Vec<String> {
        pricing::option_labels(&self.product, &self.selected_options)
    }

    fn recompute(&mut self) {
        self.line_total = pricing::line_total(self.unit_price, self.quantity);
    }
}

/// Persisted cart snapshot
#[derive(Debug, Serialize, Deserialize)]
struct CartSnapshot {
    version: u32,
    items: Vec<CartItem>,
}

/// Limits applied to cart input
#[derive(Debug, Clone, Copy)]
pub struct CartLimits {
    pub max_quantity: u32,
    pub max_note_len: usize,
}

impl Default for CartLimits {
    fn default() -> Self {
        Self {
            max_quantity: 99,
            max_note_len: 200,
        }
    }
}

impl From<&crate::OrderingConfig> for CartLimits {
    fn from(config: &crate::OrderingConfig) -> Self {
        Self {
            max_quantity: config.max_quantity,
            max_note_len: config.max_note_len,
        }
    }
}

/// Cart ledger
pub struct CartLedger<S: LocalStorage> {
    items: Vec<CartItem>,
    storage: S,
    limits: CartLimits,
}

impl<S: LocalStorage> CartLedger<S> {
    /// Create an empty cart (does not read storage)
    pub fn new(storage: S) -> Self {
        Self {
            items: Vec::new(),
            storage,
            limits: CartLimits::default(),
        }
    }

    /// Restore the cart from storage
    ///
    /// Absent, unreadable or corrupt snapshots yield an empty cart; nothing
    /// is surfaced to the user.
    pub fn restore(storage: S) -> Self {
        let items = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<CartSnapshot>(&text) {
                Ok(snapshot) => sanitize(snapshot.items),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding corrupt cart snapshot");
                    let _ = storage.remove(CART_STORAGE_KEY);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart snapshot");
                Vec::new()
            }
        };

        tracing::debug!(lines = items.len(), "Cart restored");
        Self {
            items,
            storage,
            limits: CartLimits::default(),
        }
    }

    /// Set input limits (builder style)
    pub fn with_limits(mut self, limits: CartLimits) -> Self {
        self.limits = limits;
        self
    }

    // ========== Mutations ==========

    /// Add a line, merging into an identical one if present
    ///
    /// Returns the index of the affected line.
    pub fn add_item(
        &mut self,
        product: &Product,
        selected_options: SelectedOptions,
        note: Option<&str>,
        quantity: u32,
    ) -> Result<usize, ValidationError> {
        self.check_quantity(i64::from(quantity))?;
        pricing::validate_selection(product, &selected_options)?;

        let note = note.map(str::trim).filter(|n| !n.is_empty());
        if let Some(n) = note
            && n.chars().count() > self.limits.max_note_len
        {
            return Err(ValidationError::NoteTooLong(self.limits.max_note_len));
        }

        let unit_price = pricing::unit_price(product, &selected_options);
        let instance_id = generate_instance_id(&product.id, &selected_options, note);

        let index = match self.items.iter().position(|i| i.instance_id == instance_id) {
            Some(index) => {
                let item = &mut self.items[index];
                let merged = item.quantity.saturating_add(quantity);
                if merged > self.limits.max_quantity {
                    return Err(ValidationError::InvalidQuantity {
                        got: i64::from(merged),
                        max: self.limits.max_quantity,
                    });
                }
                item.quantity = merged;
                item.unit_price = unit_price;
                item.product = product.clone();
                item.recompute();
                tracing::debug!(product = %product.name, quantity = merged, "Merged cart line");
                index
            }
            None => {
                let mut item = CartItem {
                    instance_id,
                    product: product.clone(),
                    quantity,
                    selected_options,
                    note: note.map(str::to_string),
                    unit_price,
                    line_total: Decimal::ZERO,
                };
                item.recompute();
                self.items.push(item);
                tracing::debug!(product = %product.name, quantity, "Added cart line");
                self.items.len() - 1
            }
        };

        self.persist();
        Ok(index)
    }

    /// Change a line's quantity; anything below 1 removes the line
    pub fn update_quantity(&mut self, index: usize, quantity: i32) -> Result<(), ValidationError> {
        if index >= self.items.len() {
            return Err(ValidationError::ItemNotFound(index));
        }
        if quantity < 1 {
            self.items.remove(index);
        } else {
            self.check_quantity(i64::from(quantity))?;
            let item = &mut self.items[index];
            item.quantity = quantity.unsigned_abs();
            item.recompute();
        }
        self.persist();
        Ok(())
    }

    /// Remove a line
    pub fn remove_item(&mut self, index: usize) -> Result<CartItem, ValidationError> {
        if index >= self.items.len() {
            return Err(ValidationError::ItemNotFound(index));
        }
        let removed = self.items.remove(index);
        self.persist();
        Ok(removed)
    }

    /// Remove every line
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    // ========== Queries ==========

    /// `Σ line_total`
    pub fn subtotal(&self) -> Decimal {
        round_money(self.items.iter().map(|i| i.line_total).sum())
    }

    /// Total quantity across lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn line(&self, index: usize) -> Option<&CartItem> {
        self.items.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ========== Internal ==========

    fn check_quantity(&self, quantity: i64) -> Result<(), ValidationError> {
        if quantity < 1 || quantity > i64::from(self.limits.max_quantity) {
            return Err(ValidationError::InvalidQuantity {
                got: quantity,
                max: self.limits.max_quantity,
            });
        }
        Ok(())
    }

    /// Write the full snapshot (not a diff)
    fn persist(&self) {
        let result = if self.items.is_empty() {
            self.storage.remove(CART_STORAGE_KEY)
        } else {
            let snapshot = CartSnapshot {
                version: SNAPSHOT_VERSION,
                items: self.items.clone(),
            };
            match serde_json::to_string(&snapshot) {
                Ok(json) => self.storage.set(CART_STORAGE_KEY, &json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize cart snapshot");
                    return;
                }
            }
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist cart snapshot");
        }
    }
}

/// Drop restored lines that violate cart invariants and re-derive totals
fn sanitize(items: Vec<CartItem>) -> Vec<CartItem> {
    items
        .into_iter()
        .filter(|i| i.quantity >= 1)
        .map(|mut i| {
            i.recompute();
            i
        })
        .collect()
}
