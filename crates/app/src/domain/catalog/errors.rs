//! Catalog service errors.

use sqlx::Error;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CatalogServiceError {
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CatalogServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
