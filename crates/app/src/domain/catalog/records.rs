//! Catalog Records

use sqlx::{FromRow, Row, postgres::PgRow};
use tally::products::ProductId;

use crate::database::try_get_amount;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: ProductId,

    /// Catalog price: per kilogram for weighed goods, per piece otherwise.
    pub price: u64,

    pub measurement_unit: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ProductId::new(row.try_get("id")?),
            price: try_get_amount(row, "price")?,
            measurement_unit: row.try_get("measurement_unit")?,
        })
    }
}
