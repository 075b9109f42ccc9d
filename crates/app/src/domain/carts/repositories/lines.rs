//! Cart Lines Repository

use sqlx::{Postgres, Transaction, query, query_as};
use tally::{lines::CartLine, products::ProductId, weight::WeightKey};

use crate::{
    database::amount_to_db,
    domain::{carts::records::StoredLine, identity::CustomerUuid},
};

const GET_CART_LINES_SQL: &str = include_str!("../sql/get_cart_lines.sql");
const UPSERT_CART_LINE_SQL: &str = include_str!("../sql/upsert_cart_line.sql");
const DELETE_CART_LINE_SQL: &str = include_str!("../sql/delete_cart_line.sql");
const DELETE_ALL_CART_LINES_SQL: &str = include_str!("../sql/delete_all_cart_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<StoredLine>, sqlx::Error> {
        query_as::<Postgres, StoredLine>(GET_CART_LINES_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_cart_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        line: &CartLine,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_CART_LINE_SQL)
            .bind(customer.into_uuid())
            .bind(line.product_id.get())
            .bind(line.weight_key.as_str())
            .bind(i64::from(line.quantity))
            .bind(amount_to_db(line.unit_price)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_cart_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        product: ProductId,
        weight_key: &WeightKey,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_LINE_SQL)
            .bind(customer.into_uuid())
            .bind(product.get())
            .bind(weight_key.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_all_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ALL_CART_LINES_SQL)
            .bind(customer.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
