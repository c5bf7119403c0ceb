//! Cafe Client - gateway client for the spreadsheet-backed store
//!
//! Provides the action-dispatch HTTP client and the [`RemoteStore`] seam the
//! ordering and kitchen crates are written against.

pub mod config;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "in-memory"))]
pub mod memory;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::NetworkGateway;
#[cfg(any(test, feature = "in-memory"))]
pub use memory::InMemoryStore;
pub use store::RemoteStore;

// Re-export shared gateway types for convenience
pub use shared::client::{
    ApiAction, CouponValidationRequest, CouponValidationResponse, OrdersResponse,
    SaveOrderResponse, StatusUpdateRequest, StatusUpdateResponse,
};
