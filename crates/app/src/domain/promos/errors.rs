//! Promo service errors.

use sqlx::Error;
use tally::promos::PromoRejection;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PromoServiceError {
    #[error("promo code not found")]
    NotFound,

    #[error(transparent)]
    Rejected(#[from] PromoRejection),

    #[error("promo record holds invalid data")]
    InvalidData,

    #[error("storage error")]
    Storage(#[source] Error),
}

impl From<Error> for PromoServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Storage(error)
    }
}
