//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        identity::CustomerUuid,
        orders::{
            data::NewOrder, errors::OrdersServiceError, records::OrderRecord,
            repositories::PgOrdersRepository,
        },
        promos::repositories::PgPromosRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    promos: PgPromosRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            promos: PgPromosRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.count_orders",
        skip(self),
        fields(customer_uuid = %customer),
        err
    )]
    async fn count_orders(&self, customer: CustomerUuid) -> Result<u64, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let count = self.orders.count_orders(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(count)
    }

    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            order_uuid = %order.uuid,
            customer_uuid = %order.customer,
            line_count = order.lines.len(),
            promo_code = order.promo_code.as_deref().unwrap_or("-")
        ),
        err
    )]
    async fn place_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.orders.create_order(&mut tx, &order).await?;

        self.orders
            .create_order_lines(&mut tx, &record, &order.lines)
            .await?;

        // The usage count moves in the same transaction as the order row,
        // once per completed order and never on mere promo application.
        if let Some(code) = &order.promo_code {
            self.promos.increment_usage(&mut tx, code).await?;
        }

        tx.commit().await?;

        info!(order_uuid = %record.uuid, total = record.total, "placed order");

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Number of completed orders for a customer.
    async fn count_orders(&self, customer: CustomerUuid) -> Result<u64, OrdersServiceError>;

    /// Persist a completed order.
    ///
    /// Called once payment success is confirmed. Increments the applied
    /// promo's usage count exactly once, in the same transaction as the
    /// order row.
    async fn place_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError>;
}
