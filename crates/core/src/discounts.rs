//! Discount utilities
//!
//! Shared percentage math used by promo evaluation.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Calculate a percentage of a whole-currency-unit amount, rounded to the
/// nearest whole unit.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows
/// or cannot be safely represented.
pub fn percent_of(percent: &Percentage, amount: u64) -> Result<u64, DiscountError> {
    ((*percent) * Decimal::ONE) // the percentage crate doesn't expose its underlying Decimal
        .checked_mul(Decimal::from(amount))
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(DiscountError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_of_calculates_correctly() -> TestResult {
        let percent = Percentage::from(0.10);

        assert_eq!(percent_of(&percent, 500)?, 50);

        Ok(())
    }

    #[test]
    fn percent_of_rounds_midpoints_away_from_zero() -> TestResult {
        // 10% of 45 = 4.5, which rounds up.
        let percent = Percentage::from(0.10);

        assert_eq!(percent_of(&percent, 45)?, 5);

        Ok(())
    }

    #[test]
    fn percent_of_overflow_returns_error() -> TestResult {
        let percent = Percentage::try_from("100000000000000000000")?;
        let result = percent_of(&percent, u64::MAX);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));

        Ok(())
    }

    #[test]
    fn negative_percentage_returns_error() {
        let percent = Percentage::from(-0.10);
        let result = percent_of(&percent, 500);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));
    }
}
