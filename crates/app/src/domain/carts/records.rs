//! Cart Records

use sqlx::{FromRow, Row, postgres::PgRow};
use tally::products::ProductId;

use crate::database::try_get_amount;

/// One persisted cart line, as stored remotely.
///
/// The unit price is optional because lines persisted before unit prices
/// were cached carry none; those are repriced from the catalog on load.
#[derive(Debug, Clone)]
pub struct StoredLine {
    pub product_id: ProductId,
    pub weight_key: String,
    pub quantity: u32,
    pub unit_price: Option<u64>,
}

impl<'r> FromRow<'r, PgRow> for StoredLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity_i64: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        let unit_price = row
            .try_get::<Option<i64>, _>("unit_price")?
            .map(|_| try_get_amount(row, "unit_price"))
            .transpose()?;

        Ok(Self {
            product_id: ProductId::new(row.try_get("product_id")?),
            weight_key: row.try_get("weight_key")?,
            quantity,
            unit_price,
        })
    }
}
