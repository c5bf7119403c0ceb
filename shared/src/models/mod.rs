//! Domain models
//!
//! Read-only catalog and checkout inputs fetched from the remote store.

pub mod coupon;
pub mod product;
pub mod zone;

// Re-exports
pub use coupon::*;
pub use product::*;
pub use zone::*;
