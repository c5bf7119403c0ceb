//! Delivery Zone Resolver
//!
//! Maps a free-text neighborhood to a configured delivery zone. Matching is
//! done on normalized names, in three passes over the active zones:
//!
//! 1. exact match
//! 2. containment (either direction)
//! 3. token overlap on words longer than 3 characters
//!
//! Anything else is unserved: delivery checkout is blocked, pickup and
//! dine-in stay available.

mod normalize;

pub use normalize::normalize;

use crate::error::ValidationError;
use cafe_client::{ClientResult, RemoteStore};
use rust_decimal::Decimal;
use shared::models::{DeliveryZone, format_eta};

/// Minimum token length (exclusive) for the token-overlap pass
const MIN_TOKEN_LEN: usize = 3;

/// Result of resolving a neighborhood
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneResolution {
    /// Configured zone name (as stored), or the input when unserved
    pub zone_name: String,
    pub fee: Decimal,
    pub eta_min_minutes: u32,
    pub eta_max_minutes: u32,
    pub served: bool,
    /// User-facing message
    pub message: String,
}

impl ZoneResolution {
    fn matched(zone: &DeliveryZone) -> Self {
        let eta = zone.eta_label();
        let message = if eta.is_empty() {
            format!("Entrega em {}", zone.name)
        } else {
            format!("Entrega em {} ({})", zone.name, eta)
        };
        Self {
            zone_name: zone.name.clone(),
            fee: zone.fee,
            eta_min_minutes: zone.eta_min_minutes,
            eta_max_minutes: zone.eta_max_minutes,
            served: true,
            message,
        }
    }

    fn unserved(input: &str) -> Self {
        Self {
            zone_name: input.trim().to_string(),
            fee: Decimal::ZERO,
            eta_min_minutes: 0,
            eta_max_minutes: 0,
            served: false,
            message: "Ainda não entregamos neste bairro; a retirada continua disponível".into(),
        }
    }

    /// ETA label, empty when unknown
    pub fn eta_label(&self) -> String {
        format_eta(self.eta_min_minutes, self.eta_max_minutes)
    }

    /// Require a served zone (delivery checkout gate)
    pub fn require_served(&self) -> Result<(), ValidationError> {
        if self.served {
            Ok(())
        } else {
            Err(ValidationError::ZoneUnserved(self.message.clone()))
        }
    }
}

/// Resolve a neighborhood against the zone table
pub fn resolve(input: &str, zones: &[DeliveryZone]) -> ZoneResolution {
    let needle = normalize(input);
    if needle.is_empty() {
        return ZoneResolution::unserved(input);
    }

    let candidates: Vec<(String, &DeliveryZone)> = zones
        .iter()
        .filter(|z| z.active)
        .map(|z| (normalize(&z.name), z))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    let found = candidates
        .iter()
        .find(|(name, _)| *name == needle)
        .or_else(|| {
            candidates
                .iter()
                .find(|(name, _)| needle.contains(name.as_str()) || name.contains(needle.as_str()))
        })
        .or_else(|| {
            let tokens: Vec<&str> = needle
                .split(' ')
                .filter(|t| t.chars().count() > MIN_TOKEN_LEN)
                .collect();
            candidates
                .iter()
                .find(|(name, _)| tokens.iter().any(|t| name.contains(*t)))
        });

    match found {
        Some((_, zone)) => {
            tracing::debug!(input = %input, zone = %zone.name, "Delivery zone resolved");
            ZoneResolution::matched(zone)
        }
        None => {
            tracing::debug!(input = %input, "Delivery zone unserved");
            ZoneResolution::unserved(input)
        }
    }
}

/// Zone resolver bound to a remote store
///
/// The zone table is read-only input, fetched once per checkout session.
pub struct DeliveryZoneResolver<R> {
    store: R,
    zones: Option<Vec<DeliveryZone>>,
}

impl<R: RemoteStore> DeliveryZoneResolver<R> {
    pub fn new(store: R) -> Self {
        Self { store, zones: None }
    }

    /// Fetch the zone table (`getBairros`) if not yet loaded
    pub async fn load(&mut self) -> ClientResult<&[DeliveryZone]> {
        if self.zones.is_none() {
            let zones = self.store.fetch_zones().await?;
            tracing::info!(count = zones.len(), "Loaded delivery zones");
            self.zones = Some(zones);
        }
        Ok(self.zones.as_deref().unwrap_or_default())
    }

    /// Drop the cached table; the next resolve fetches again
    pub fn invalidate(&mut self) {
        self.zones = None;
    }

    /// Resolve a neighborhood, loading the zone table on first use
    pub async fn resolve(&mut self, input: &str) -> ClientResult<ZoneResolution> {
        let zones = self.load().await?;
        Ok(resolve(input, zones))
    }

    /// Active zones, for a picker
    pub fn active_zones(&self) -> Vec<&DeliveryZone> {
        self.zones
            .iter()
            .flatten()
            .filter(|z| z.active)
            .collect()
    }
}
