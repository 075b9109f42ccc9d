//! Pricing
//!
//! Line totals and subtotals, plus the compatibility path that derives a
//! unit price from a per-kilogram catalog price for lines persisted before
//! unit prices were cached.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::{lines::CartLine, weight::WeightKey};

/// Grams assumed when a weight selector does not parse: priced per kilogram.
const FALLBACK_GRAMS: u64 = 1000;

/// Errors from price derivation.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A derived amount overflowed or could not be represented.
    #[error("price arithmetic overflowed or was not representable")]
    AmountConversion,
}

/// Total for a single line: unit price times quantity.
///
/// # Errors
///
/// Returns [`PricingError::AmountConversion`] when the multiplication
/// overflows.
pub fn line_total(line: &CartLine) -> Result<u64, PricingError> {
    line.unit_price
        .checked_mul(u64::from(line.quantity))
        .ok_or(PricingError::AmountConversion)
}

/// Sum of all line totals.
///
/// Each line total is a whole currency unit before summation; rounding
/// happens per line, not once at the end.
///
/// # Errors
///
/// Returns [`PricingError::AmountConversion`] when a line total or the sum
/// overflows.
pub fn subtotal(lines: &[CartLine]) -> Result<u64, PricingError> {
    lines.iter().try_fold(0_u64, |sum, line| {
        sum.checked_add(line_total(line)?)
            .ok_or(PricingError::AmountConversion)
    })
}

/// Derive a unit price from a per-kilogram catalog price and a weight key.
///
/// Computes `price_per_kg / 1000 * grams`, rounded to the nearest whole
/// currency unit, where `grams` is parsed from the weight key. A key that
/// does not parse as a positive number of grams (including the default
/// per-piece key) is priced as one kilogram.
///
/// This exists for persisted lines that predate unit-price caching; new
/// lines carry their unit price from the catalog selection instead.
///
/// # Errors
///
/// Returns [`PricingError::AmountConversion`] when the derived amount
/// overflows or cannot be represented.
pub fn derive_unit_price(price_per_kg: u64, weight_key: &WeightKey) -> Result<u64, PricingError> {
    let grams = weight_key
        .as_str()
        .parse::<Decimal>()
        .ok()
        .filter(|parsed| parsed.is_sign_positive() && !parsed.is_zero())
        .unwrap_or_else(|| Decimal::from(FALLBACK_GRAMS));

    Decimal::from(price_per_kg)
        .checked_div(Decimal::ONE_THOUSAND)
        .and_then(|per_gram| per_gram.checked_mul(grams))
        .map(|amount| amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|amount| amount.to_u64())
        .ok_or(PricingError::AmountConversion)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    fn line(quantity: u32, unit_price: u64) -> CartLine {
        CartLine::new(ProductId::new(1), WeightKey::from("500"), quantity, unit_price)
    }

    #[test]
    fn line_total_multiplies_unit_price_by_quantity() -> TestResult {
        assert_eq!(line_total(&line(2, 250))?, 500);

        Ok(())
    }

    #[test]
    fn line_total_overflow_returns_error() {
        let result = line_total(&line(2, u64::MAX));

        assert!(matches!(result, Err(PricingError::AmountConversion)));
    }

    #[test]
    fn subtotal_sums_all_line_totals() -> TestResult {
        let lines = [line(2, 250), line(1, 80)];

        assert_eq!(subtotal(&lines)?, 580);

        Ok(())
    }

    #[test]
    fn subtotal_of_empty_cart_is_zero() -> TestResult {
        assert_eq!(subtotal(&[])?, 0);

        Ok(())
    }

    #[test]
    fn derive_unit_price_scales_per_kilogram_price() -> TestResult {
        let price = derive_unit_price(400, &WeightKey::from("250"))?;

        assert_eq!(price, 100);

        Ok(())
    }

    #[test]
    fn derive_unit_price_rounds_to_whole_units() -> TestResult {
        // 333 per kg at 125 g = 41.625, which rounds away from zero.
        let price = derive_unit_price(333, &WeightKey::from("125"))?;

        assert_eq!(price, 42);

        Ok(())
    }

    #[test]
    fn unparseable_weight_is_priced_per_kilogram() -> TestResult {
        let price = derive_unit_price(400, &WeightKey::from("a bunch"))?;

        assert_eq!(price, 400);

        Ok(())
    }

    #[test]
    fn default_key_is_priced_per_kilogram() -> TestResult {
        let price = derive_unit_price(400, &WeightKey::default_key())?;

        assert_eq!(price, 400);

        Ok(())
    }

    #[test]
    fn non_positive_weight_is_priced_per_kilogram() -> TestResult {
        assert_eq!(derive_unit_price(400, &WeightKey::from("-250"))?, 400);
        assert_eq!(derive_unit_price(400, &WeightKey::from("0"))?, 400);

        Ok(())
    }
}
