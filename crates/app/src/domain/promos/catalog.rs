//! Promo catalog boundary.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::promos::{
        errors::PromoServiceError, records::PromoRecord, repositories::PgPromosRepository,
    },
};

#[automock]
#[async_trait]
pub trait PromoCatalog: Send + Sync {
    /// Look up a promo code, case-insensitively.
    async fn find_by_code(&self, code: &str) -> Result<Option<PromoRecord>, PromoServiceError>;
}

#[derive(Debug, Clone)]
pub struct PgPromoCatalog {
    db: Db,
    repository: PgPromosRepository,
}

impl PgPromoCatalog {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromosRepository::new(),
        }
    }
}

#[async_trait]
impl PromoCatalog for PgPromoCatalog {
    async fn find_by_code(&self, code: &str) -> Result<Option<PromoRecord>, PromoServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.find_by_code(&mut tx, code).await?;

        tx.commit().await?;

        Ok(record)
    }
}
