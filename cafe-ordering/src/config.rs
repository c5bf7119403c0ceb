//! Ordering configuration

use std::path::PathBuf;
use std::time::Duration;

/// Ordering-side configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CAFE_COUNTRY_CODE | 55 | Country calling code for phone normalization |
/// | CAFE_MESSAGING_HOST | wa.me | Deep-link host |
/// | CAFE_STORE_PHONE | (empty) | Store number receiving order summaries |
/// | CAFE_DATA_DIR | ./data | Directory for the persisted cart |
/// | CAFE_FALLBACK_DISMISS_SECS | 8 | Auto-dismiss for the blocked-link prompt |
#[derive(Debug, Clone)]
pub struct OrderingConfig {
    /// Country calling code, digits only
    pub country_code: String,
    /// Messaging deep-link host
    pub messaging_host: String,
    /// Store phone that receives order summaries
    pub store_phone: String,
    /// Cart storage directory
    pub data_dir: PathBuf,
    /// How long the manual-open prompt stays visible
    pub fallback_dismiss: Duration,
    /// Max quantity for a single cart line
    pub max_quantity: u32,
    /// Max note length in characters
    pub max_note_len: usize,
}

impl OrderingConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            country_code: std::env::var("CAFE_COUNTRY_CODE").unwrap_or(defaults.country_code),
            messaging_host: std::env::var("CAFE_MESSAGING_HOST")
                .unwrap_or(defaults.messaging_host),
            store_phone: std::env::var("CAFE_STORE_PHONE").unwrap_or(defaults.store_phone),
            data_dir: std::env::var("CAFE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            fallback_dismiss: std::env::var("CAFE_FALLBACK_DISMISS_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.fallback_dismiss),
            max_quantity: defaults.max_quantity,
            max_note_len: defaults.max_note_len,
        }
    }

    pub fn with_store_phone(mut self, phone: impl Into<String>) -> Self {
        self.store_phone = phone.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_fallback_dismiss(mut self, duration: Duration) -> Self {
        self.fallback_dismiss = duration;
        self
    }
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            country_code: "55".into(),
            messaging_host: "wa.me".into(),
            store_phone: String::new(),
            data_dir: PathBuf::from("./data"),
            fallback_dismiss: Duration::from_secs(8),
            max_quantity: 99,
            max_note_len: 200,
        }
    }
}
