//! Order Module
//!
//! Types for orders as submitted by the ordering client and as read back by
//! the kitchen feed:
//! - Types: fulfillment, payment, customer and item snapshots
//! - Status: the kitchen-side status state machine
//! - Snapshot: the canonical order record

pub mod snapshot;
pub mod status;
pub mod types;

// Re-exports
pub use snapshot::Order;
pub use status::OrderStatus;
pub use types::*;
