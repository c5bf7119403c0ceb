//! Cafe Ordering - customer-side order pipeline
//!
//! Cart composition and pricing, delivery zone resolution, coupon
//! validation, order submission and the messaging hand-off.
//!
//! # Flow
//!
//! ```text
//! CartLedger ──► OrderSubmitter ──► RemoteStore (salvarPedido)
//!                  ▲        ▲              │
//!   DeliveryZoneResolver  CouponValidator  ▼
//!                                 NotificationDispatcher
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod coupon;
pub mod delivery;
pub mod error;
pub mod notify;
pub mod pricing;

pub use cart::{CartItem, CartLedger, CartLimits, FileStorage, LocalStorage, MemoryStorage};
pub use checkout::{CheckoutDetails, OrderSubmitter, SubmittedOrder, build_payload};
pub use config::OrderingConfig;
pub use coupon::CouponValidator;
pub use delivery::{DeliveryZoneResolver, ZoneResolution};
pub use error::{OrderingError, OrderingResult, ValidationError};
pub use notify::{
    DeliveryOutcome, FallbackPrompt, LinkOpener, NotificationDispatcher, SystemOpener,
};
