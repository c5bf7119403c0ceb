//! Pricing Engine
//!
//! Pure functions computing unit and line prices from a product and its
//! selected options. Uses rust_decimal; every result is rounded to cents.

mod calculator;

pub use calculator::*;
