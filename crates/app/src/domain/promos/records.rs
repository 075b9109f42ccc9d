//! Promo Records

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Row, postgres::PgRow};
use tally::promos::{PromoCode, PromoDiscount};

use crate::{database::try_get_amount, domain::promos::errors::PromoServiceError};

/// Discount kind stored for percentage promos.
const KIND_PERCENTAGE: &str = "percentage";

/// Discount kind stored for fixed-amount promos.
const KIND_FIXED: &str = "fixed";

/// Promo Record
///
/// The raw storage row. `value` is percentage points or a fixed currency
/// amount, interpreted per `kind`.
#[derive(Debug, Clone)]
pub struct PromoRecord {
    pub code: String,
    pub kind: String,
    pub value: f64,
    pub usage_count: u32,
    pub usage_limit: Option<u32>,
    pub valid_from: Timestamp,
    pub valid_to: Timestamp,
    pub enabled: bool,
    pub min_order_amount: u64,
    pub first_order_only: bool,
}

impl PromoRecord {
    /// Convert the storage row into the engine's promo code.
    ///
    /// # Errors
    ///
    /// Returns [`PromoServiceError::InvalidData`] for an unknown kind or a
    /// negative fixed amount.
    pub fn into_promo(self) -> Result<PromoCode, PromoServiceError> {
        let discount = match self.kind.as_str() {
            KIND_PERCENTAGE => PromoDiscount::from_percent_points(self.value),
            KIND_FIXED if self.value >= 0.0 => PromoDiscount::AmountOff(self.value.round() as u64),
            _ => return Err(PromoServiceError::InvalidData),
        };

        Ok(PromoCode {
            code: self.code,
            discount,
            usage_count: self.usage_count,
            usage_limit: self.usage_limit,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            enabled: self.enabled,
            min_order_amount: self.min_order_amount,
            first_order_only: self.first_order_only,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PromoRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let usage_count_i64: i64 = row.try_get("usage_count")?;
        let usage_count = u32::try_from(usage_count_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "usage_count".to_string(),
            source: Box::new(e),
        })?;

        let usage_limit = row
            .try_get::<Option<i64>, _>("usage_limit")?
            .map(|limit| {
                u32::try_from(limit).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "usage_limit".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        Ok(Self {
            code: row.try_get("code")?,
            kind: row.try_get("kind")?,
            value: row.try_get("value")?,
            usage_count,
            usage_limit,
            valid_from: row.try_get::<SqlxTimestamp, _>("valid_from")?.to_jiff(),
            valid_to: row.try_get::<SqlxTimestamp, _>("valid_to")?.to_jiff(),
            enabled: row.try_get("enabled")?,
            min_order_amount: try_get_amount(row, "min_order_amount")?,
            first_order_only: row.try_get("first_order_only")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, value: f64) -> PromoRecord {
        PromoRecord {
            code: "WELCOME10".to_owned(),
            kind: kind.to_owned(),
            value,
            usage_count: 0,
            usage_limit: None,
            valid_from: Timestamp::UNIX_EPOCH,
            valid_to: Timestamp::MAX,
            enabled: true,
            min_order_amount: 0,
            first_order_only: false,
        }
    }

    #[test]
    fn percentage_kind_maps_to_a_percentage_discount() {
        let promo = record(KIND_PERCENTAGE, 10.0)
            .into_promo()
            .expect("conversion should succeed");

        assert!(matches!(promo.discount, PromoDiscount::PercentOff(_)));
    }

    #[test]
    fn fixed_kind_maps_to_an_amount_discount() {
        let promo = record(KIND_FIXED, 50.0)
            .into_promo()
            .expect("conversion should succeed");

        assert!(matches!(promo.discount, PromoDiscount::AmountOff(50)));
    }

    #[test]
    fn unknown_kind_is_invalid() {
        let result = record("bogof", 1.0).into_promo();

        assert!(matches!(result, Err(PromoServiceError::InvalidData)));
    }

    #[test]
    fn negative_fixed_amount_is_invalid() {
        let result = record(KIND_FIXED, -5.0).into_promo();

        assert!(matches!(result, Err(PromoServiceError::InvalidData)));
    }
}
