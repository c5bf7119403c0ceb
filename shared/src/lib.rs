//! Shared types for the café ordering stack
//!
//! Domain models, order types and gateway DTOs used by the ordering
//! client, the kitchen feed and the gateway client.

pub mod client;
pub mod models;
pub mod money;
pub mod order;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use models::{
    Coupon, CouponInfo, CouponTag, DeliveryZone, OptionGroup, Product, ProductOption,
    SelectedOptions,
};
pub use order::{
    CustomerInfo, FulfillmentType, Order, OrderItemSnapshot, OrderStatus, PaymentMethod,
};
