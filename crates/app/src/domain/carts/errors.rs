//! Cart store errors.

use thiserror::Error;

use crate::domain::catalog::CatalogServiceError;

#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Cart mutation attempted without a signed-in customer.
    #[error("sign in to modify the cart")]
    IdentityRequired,

    /// A remote cart read or write failed. For add/remove/update the store
    /// has already resynchronized from remote truth by the time this
    /// surfaces; for clear it has restored its pre-clear snapshot.
    #[error("remote cart storage unavailable")]
    Remote(#[source] sqlx::Error),

    /// Catalog lookup failed while resolving line prices.
    #[error("catalog unavailable")]
    Catalog(#[from] CatalogServiceError),

    /// Line price arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] tally::pricing::PricingError),
}
