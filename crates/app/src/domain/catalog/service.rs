//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use tally::products::ProductId;

use crate::{
    database::Db,
    domain::catalog::{errors::CatalogServiceError, records::ProductRecord, repository::PgProductsRepository},
};

#[derive(Debug, Clone)]
pub struct PgCatalog {
    db: Db,
    repository: PgProductsRepository,
}

impl PgCatalog {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn fetch_product(
        &self,
        product: ProductId,
    ) -> Result<Option<ProductRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Retrieve a single product, if it exists.
    async fn fetch_product(
        &self,
        product: ProductId,
    ) -> Result<Option<ProductRecord>, CatalogServiceError>;
}
