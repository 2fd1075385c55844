//! Value types shared by the resource records.
//!
//! # Key Types
//!
//! - [`Rate`], [`RatePeriod`] - interest and charge rates
//! - [`Money`], [`Fee`] - amounts and product fees
//! - [`Months`], [`Years`] - durations with a human description
//! - [`ProductType`] - the product families the service knows about
//!
//! All of these are plain values whose JSON field names are fixed by the
//! service.

pub mod product_type;
pub use product_type::ProductType;
pub mod values;
pub use values::{Fee, Money, Months, Rate, RatePeriod, Years};

/// Marks a product as highlighted in exported table data.
///
/// Valid values are `"true"` and `true`.
pub const ANNOTATION_HIGHLIGHTED_PRODUCT: &str = "comparisonapis/products/highlighted";
