//! Orders Repository

use sqlx::{Postgres, Transaction, query, query_as, query_scalar};
use tally::lines::CartLine;

use crate::{
    database::amount_to_db,
    domain::{
        identity::CustomerUuid,
        orders::{data::NewOrder, records::OrderRecord},
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const CREATE_ORDER_LINE_SQL: &str = include_str!("../sql/create_order_line.sql");
const COUNT_ORDERS_SQL: &str = include_str!("../sql/count_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.customer.into_uuid())
            .bind(amount_to_db(order.billing.subtotal)?)
            .bind(amount_to_db(order.billing.discount)?)
            .bind(amount_to_db(order.billing.shipping_fee)?)
            .bind(amount_to_db(order.billing.total)?)
            .bind(order.promo_code.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
        lines: &[CartLine],
    ) -> Result<(), sqlx::Error> {
        for line in lines {
            query(CREATE_ORDER_LINE_SQL)
                .bind(order.uuid.into_uuid())
                .bind(line.product_id.get())
                .bind(line.weight_key.as_str())
                .bind(i64::from(line.quantity))
                .bind(amount_to_db(line.unit_price)?)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}
