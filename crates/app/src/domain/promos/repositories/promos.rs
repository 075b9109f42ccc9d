//! Promos Repository

use sqlx::{Postgres, Transaction, query, query_as};

use crate::domain::promos::records::PromoRecord;

const FIND_PROMO_BY_CODE_SQL: &str = include_str!("../sql/find_promo_by_code.sql");
const INCREMENT_PROMO_USAGE_SQL: &str = include_str!("../sql/increment_promo_usage.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromosRepository;

impl PgPromosRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<PromoRecord>, sqlx::Error> {
        query_as::<Postgres, PromoRecord>(FIND_PROMO_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn increment_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(INCREMENT_PROMO_USAGE_SQL)
            .bind(code)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
