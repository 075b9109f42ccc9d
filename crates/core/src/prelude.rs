//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    billing::{BillingSnapshot, ShippingPolicy, aggregate},
    discounts::DiscountError,
    lines::{CartLine, merge_lines},
    pricing::{PricingError, derive_unit_price, line_total, subtotal},
    products::{ProductId, ProductSelection},
    promos::{PromoCode, PromoDiscount, PromoRejection, evaluate},
    weight::{DEFAULT_WEIGHT_KEY, WeightKey},
};
