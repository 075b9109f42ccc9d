//! Promo codes
//!
//! Validation and discount computation for promotional codes. A code is
//! checked against its kill-switch, activity window, usage limit, minimum
//! order amount and first-order restriction, in that order; the first
//! failing check decides the rejection reason shown to the shopper.
//!
//! Incrementing a code's usage count is deliberately not part of evaluation:
//! it happens exactly once, at order finalization, after payment success.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use thiserror::Error;

use crate::discounts::percent_of;

/// Discount granted by a promo code.
#[derive(Debug, Clone, Copy)]
pub enum PromoDiscount {
    /// Percentage off the order subtotal.
    PercentOff(Percentage),

    /// Fixed amount off the order subtotal, in whole currency units.
    AmountOff(u64),
}

impl PromoDiscount {
    /// Percentage discount from whole percentage points (`10.0` → 10% off).
    #[must_use]
    pub fn from_percent_points(points: f64) -> Self {
        Self::PercentOff(Percentage::from(points / 100.0))
    }
}

/// A discount rule identified by a unique, case-insensitively matched code.
///
/// Read-only from the cart's perspective; codes are owned by the catalog and
/// admin subsystem. A cart holds at most one applied code at a time.
#[derive(Debug, Clone)]
pub struct PromoCode {
    /// Unique code, matched case-insensitively.
    pub code: String,

    /// The discount this code grants.
    pub discount: PromoDiscount,

    /// Completed orders that have used this code so far.
    pub usage_count: u32,

    /// Optional cap on [`usage_count`](Self::usage_count).
    pub usage_limit: Option<u32>,

    /// Start of the inclusive activity window.
    pub valid_from: Timestamp,

    /// End of the inclusive activity window.
    pub valid_to: Timestamp,

    /// Kill-switch independent of the activity window.
    pub enabled: bool,

    /// Subtotal floor required to apply the code.
    pub min_order_amount: u64,

    /// Restricts eligibility to customers with no prior completed orders.
    pub first_order_only: bool,
}

/// Reasons a promo code fails validation.
///
/// Checks run in a fixed order and stop at the first failure, so the reason
/// reported for a given code is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PromoRejection {
    /// The code's kill-switch is off.
    #[error("promo code is disabled")]
    Disabled,

    /// The activity window has not opened yet.
    #[error("promo code is not active yet")]
    NotYetActive,

    /// The activity window has closed.
    #[error("promo code has expired")]
    Expired,

    /// The code has been used as many times as its limit allows.
    #[error("promo code has reached its usage limit")]
    UsageLimitReached,

    /// The order subtotal is below the code's minimum.
    #[error("order subtotal is below the promo minimum")]
    BelowMinimumOrder,

    /// The code is restricted to first orders and this customer has ordered
    /// before.
    #[error("promo code is valid on first orders only")]
    NotFirstOrder,

    /// The code is restricted to first orders and the shopper is not signed
    /// in, so eligibility cannot be established.
    #[error("sign in to use this promo code")]
    RequiresLogin,
}

/// Validate a promo code against an order subtotal and compute its bounded
/// discount.
///
/// `first_order` is `None` when the shopper's identity is unknown. The
/// returned discount never exceeds `subtotal` and is rounded to whole
/// currency units.
///
/// # Errors
///
/// Returns the first failing [`PromoRejection`] in validation order.
pub fn evaluate(
    promo: &PromoCode,
    subtotal: u64,
    first_order: Option<bool>,
    now: Timestamp,
) -> Result<u64, PromoRejection> {
    if !promo.enabled {
        return Err(PromoRejection::Disabled);
    }

    if now < promo.valid_from {
        return Err(PromoRejection::NotYetActive);
    }

    if now > promo.valid_to {
        return Err(PromoRejection::Expired);
    }

    if promo
        .usage_limit
        .is_some_and(|limit| promo.usage_count >= limit)
    {
        return Err(PromoRejection::UsageLimitReached);
    }

    if subtotal < promo.min_order_amount {
        return Err(PromoRejection::BelowMinimumOrder);
    }

    if promo.first_order_only {
        match first_order {
            Some(true) => {}
            Some(false) => return Err(PromoRejection::NotFirstOrder),
            None => return Err(PromoRejection::RequiresLogin),
        }
    }

    let raw = match promo.discount {
        // A percentage too large to represent is necessarily past the
        // subtotal clamp below.
        PromoDiscount::PercentOff(percent) => percent_of(&percent, subtotal).unwrap_or(subtotal),
        PromoDiscount::AmountOff(amount) => amount,
    };

    Ok(raw.min(subtotal))
}
