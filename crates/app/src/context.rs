//! App Context

use std::sync::Arc;

use thiserror::Error;

use tally::billing::ShippingPolicy;

use crate::{
    checkout::Checkout,
    database::{self, Db},
    domain::{
        carts::{CartRemote, CartStore, PgCartRemote},
        catalog::{Catalog, PgCatalog},
        identity::Identity,
        orders::{OrdersService, PgOrdersService},
        promos::{PgPromoCatalog, PromoCatalog},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn Catalog>,
    pub cart_remote: Arc<dyn CartRemote>,
    pub promos: Arc<dyn PromoCatalog>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            catalog: Arc::new(PgCatalog::new(db.clone())),
            cart_remote: Arc::new(PgCartRemote::new(db.clone())),
            promos: Arc::new(PgPromoCatalog::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db)),
        })
    }

    /// Build a checkout flow for the given session identity.
    #[must_use]
    pub fn checkout(&self, identity: Identity, shipping: ShippingPolicy) -> Checkout {
        let store = CartStore::new(self.cart_remote.clone(), self.catalog.clone(), identity);

        Checkout::new(store, self.promos.clone(), self.orders.clone(), shipping)
    }
}
