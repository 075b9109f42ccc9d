//! Remote cart storage boundary.

use async_trait::async_trait;
use mockall::automock;
use tally::{lines::CartLine, products::ProductId, weight::WeightKey};

use crate::{
    database::Db,
    domain::{
        carts::{records::StoredLine, repositories::PgCartLinesRepository},
        identity::CustomerUuid,
    },
};

#[automock]
#[async_trait]
pub trait CartRemote: Send + Sync {
    /// Fetch the persisted cart lines for a customer.
    async fn fetch_lines(&self, customer: CustomerUuid) -> Result<Vec<StoredLine>, sqlx::Error>;

    /// Insert or update one persisted cart line.
    async fn upsert_line(&self, customer: CustomerUuid, line: &CartLine)
    -> Result<(), sqlx::Error>;

    /// Delete one persisted cart line.
    async fn delete_line(
        &self,
        customer: CustomerUuid,
        product: ProductId,
        weight_key: &WeightKey,
    ) -> Result<(), sqlx::Error>;

    /// Delete every persisted cart line for a customer.
    async fn delete_all(&self, customer: CustomerUuid) -> Result<(), sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgCartRemote {
    db: Db,
    repository: PgCartLinesRepository,
}

impl PgCartRemote {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCartLinesRepository::new(),
        }
    }
}

#[async_trait]
impl CartRemote for PgCartRemote {
    async fn fetch_lines(&self, customer: CustomerUuid) -> Result<Vec<StoredLine>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let lines = self.repository.get_cart_lines(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(lines)
    }

    async fn upsert_line(
        &self,
        customer: CustomerUuid,
        line: &CartLine,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        self.repository
            .upsert_cart_line(&mut tx, customer, line)
            .await?;

        tx.commit().await
    }

    async fn delete_line(
        &self,
        customer: CustomerUuid,
        product: ProductId,
        weight_key: &WeightKey,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        self.repository
            .delete_cart_line(&mut tx, customer, product, weight_key)
            .await?;

        tx.commit().await
    }

    async fn delete_all(&self, customer: CustomerUuid) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        self.repository
            .delete_all_cart_lines(&mut tx, customer)
            .await?;

        tx.commit().await
    }
}
