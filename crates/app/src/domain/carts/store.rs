//! Cart store.
//!
//! Single source of truth for the current cart: an optimistic in-memory copy
//! reconciled against the remote persisted copy. In-memory state is always
//! mutated before the remote write is issued, so callers observe changes
//! immediately. A failed write resynchronizes from remote truth — except
//! `clear`, which restores its pre-clear snapshot exactly.
//!
//! The store is explicitly owned and dependency-injected; there is no
//! ambient singleton, so tests construct isolated instances.

use std::sync::Arc;

use tally::{
    lines::{self, CartLine},
    pricing,
    products::{ProductId, ProductSelection},
    weight::WeightKey,
};
use tracing::{info, warn};

use crate::domain::{
    carts::{errors::CartStoreError, records::StoredLine, remote::CartRemote},
    catalog::Catalog,
    identity::{CustomerUuid, Identity},
};

pub struct CartStore {
    identity: Identity,
    lines: Vec<CartLine>,
    remote: Arc<dyn CartRemote>,
    catalog: Arc<dyn Catalog>,
}

impl CartStore {
    #[must_use]
    pub fn new(remote: Arc<dyn CartRemote>, catalog: Arc<dyn Catalog>, identity: Identity) -> Self {
        Self {
            identity,
            lines: Vec::new(),
            remote,
            catalog,
        }
    }

    /// The identity this store is bound to.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// The current line items.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Subtotal of the current line items.
    ///
    /// # Errors
    ///
    /// Returns an error when line arithmetic overflows.
    pub fn subtotal(&self) -> Result<u64, tally::pricing::PricingError> {
        pricing::subtotal(&self.lines)
    }

    /// Replace local state with the remote persisted cart.
    ///
    /// A guest session yields an empty cart. This is also the resync path
    /// after a failed remote write.
    ///
    /// # Errors
    ///
    /// Returns an error when the remote fetch or line repricing fails.
    #[tracing::instrument(name = "carts.store.load", skip(self), err)]
    pub async fn load(&mut self) -> Result<(), CartStoreError> {
        let Some(customer) = self.identity.customer() else {
            self.lines.clear();
            return Ok(());
        };

        let stored = self
            .remote
            .fetch_lines(customer)
            .await
            .map_err(CartStoreError::Remote)?;

        self.lines = self.resolve_lines(stored).await?;

        Ok(())
    }

    /// Attach a signed-in customer and fold any guest lines into the freshly
    /// fetched remote cart.
    ///
    /// Where both sides hold a line for the same product/weight pair the
    /// quantities are summed and the persisted unit price wins; lines the
    /// merge changed or added are persisted best-effort.
    ///
    /// # Errors
    ///
    /// Returns an error when the remote fetch or line repricing fails.
    #[tracing::instrument(name = "carts.store.sign_in", skip(self), fields(customer_uuid = %customer), err)]
    pub async fn sign_in(&mut self, customer: CustomerUuid) -> Result<(), CartStoreError> {
        self.identity = Identity::Customer(customer);

        let guest_lines = std::mem::take(&mut self.lines);

        let stored = self
            .remote
            .fetch_lines(customer)
            .await
            .map_err(CartStoreError::Remote)?;

        let remote_lines = self.resolve_lines(stored).await?;
        let merged = lines::merge_lines(&remote_lines, &guest_lines);

        for line in &merged {
            if remote_lines.contains(line) {
                continue;
            }

            if let Err(error) = self.remote.upsert_line(customer, line).await {
                warn!(%error, product_id = %line.product_id, "failed to persist merged cart line");
            }
        }

        self.lines = merged;

        Ok(())
    }

    /// Add a catalog selection to the cart.
    ///
    /// When a line for the same product/weight pair already exists its
    /// quantity is incremented and its unit price kept as-is: repricing on
    /// every add would silently change already-agreed pricing for the
    /// existing units. A new line takes the selection's effective unit
    /// price.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::IdentityRequired`] for guest sessions, and
    /// [`CartStoreError::Remote`] when the persisted write fails — the
    /// optimistic add is not rolled back; the store resynchronizes from
    /// remote truth instead.
    #[tracing::instrument(
        name = "carts.store.add",
        skip(self, selection),
        fields(product_id = %selection.product_id, quantity),
        err
    )]
    pub async fn add(
        &mut self,
        selection: &ProductSelection,
        quantity: u32,
    ) -> Result<(), CartStoreError> {
        let customer = self
            .identity
            .customer()
            .ok_or(CartStoreError::IdentityRequired)?;

        if quantity == 0 {
            return Ok(());
        }

        let weight_key = selection.weight_key();

        let line = match self
            .lines
            .iter_mut()
            .find(|line| line.matches(selection.product_id, &weight_key))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity);
                existing.clone()
            }
            None => {
                let line = CartLine::new(
                    selection.product_id,
                    weight_key,
                    quantity,
                    selection.effective_unit_price(),
                );
                self.lines.push(line.clone());
                line
            }
        };

        if let Err(error) = self.remote.upsert_line(customer, &line).await {
            self.resync(customer).await;
            return Err(CartStoreError::Remote(error));
        }

        Ok(())
    }

    /// Remove the line for a product/weight pair.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::IdentityRequired`] for guest sessions, and
    /// [`CartStoreError::Remote`] when the persisted delete fails (the store
    /// resynchronizes from remote truth first).
    #[tracing::instrument(
        name = "carts.store.remove",
        skip(self),
        fields(product_id = %product, weight_key = %weight_key),
        err
    )]
    pub async fn remove(
        &mut self,
        product: ProductId,
        weight_key: &WeightKey,
    ) -> Result<(), CartStoreError> {
        let customer = self
            .identity
            .customer()
            .ok_or(CartStoreError::IdentityRequired)?;

        self.lines
            .retain(|line| !line.matches(product, weight_key));

        if let Err(error) = self.remote.delete_line(customer, product, weight_key).await {
            self.resync(customer).await;
            return Err(CartStoreError::Remote(error));
        }

        Ok(())
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line; the cart never persists
    /// a zero-quantity line. The remote update carries the line's current
    /// unit price. An unknown product/weight pair is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::IdentityRequired`] for guest sessions, and
    /// [`CartStoreError::Remote`] when the persisted write fails (the store
    /// resynchronizes from remote truth first).
    #[tracing::instrument(
        name = "carts.store.update_quantity",
        skip(self),
        fields(product_id = %product, weight_key = %weight_key, quantity),
        err
    )]
    pub async fn update_quantity(
        &mut self,
        product: ProductId,
        weight_key: &WeightKey,
        quantity: i64,
    ) -> Result<(), CartStoreError> {
        let Ok(quantity) = u32::try_from(quantity) else {
            return self.remove(product, weight_key).await;
        };

        if quantity == 0 {
            return self.remove(product, weight_key).await;
        }

        let customer = self
            .identity
            .customer()
            .ok_or(CartStoreError::IdentityRequired)?;

        let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product, weight_key))
        else {
            return Ok(());
        };

        line.quantity = quantity;
        let line = line.clone();

        if let Err(error) = self.remote.upsert_line(customer, &line).await {
            self.resync(customer).await;
            return Err(CartStoreError::Remote(error));
        }

        Ok(())
    }

    /// Empty the cart locally and remotely.
    ///
    /// Unlike the other mutations, a failed remote delete restores the
    /// pre-clear snapshot exactly instead of reloading.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::IdentityRequired`] for guest sessions, and
    /// [`CartStoreError::Remote`] when the bulk delete fails.
    #[tracing::instrument(name = "carts.store.clear", skip(self), err)]
    pub async fn clear(&mut self) -> Result<(), CartStoreError> {
        let customer = self
            .identity
            .customer()
            .ok_or(CartStoreError::IdentityRequired)?;

        let snapshot = std::mem::take(&mut self.lines);

        if let Err(error) = self.remote.delete_all(customer).await {
            self.lines = snapshot;
            return Err(CartStoreError::Remote(error));
        }

        Ok(())
    }

    /// Resolve stored lines into priced cart lines.
    ///
    /// Lines persisted before unit prices were cached are repriced from the
    /// catalog per-kilogram price; a line whose product has vanished from
    /// the catalog is dropped.
    async fn resolve_lines(
        &self,
        stored: Vec<StoredLine>,
    ) -> Result<Vec<CartLine>, CartStoreError> {
        let mut resolved = Vec::with_capacity(stored.len());

        for record in stored {
            let weight_key = WeightKey::normalize(Some(&record.weight_key), None);

            let unit_price = match record.unit_price {
                Some(price) => price,
                None => {
                    let Some(product) = self.catalog.fetch_product(record.product_id).await? else {
                        warn!(product_id = %record.product_id, "dropping cart line for unknown product");
                        continue;
                    };

                    pricing::derive_unit_price(product.price, &weight_key)?
                }
            };

            resolved.push(CartLine::new(
                record.product_id,
                weight_key,
                record.quantity,
                unit_price,
            ));
        }

        Ok(resolved)
    }

    /// Discard optimistic state and re-adopt remote truth after a failed
    /// write. Best-effort: a resync that itself fails leaves the optimistic
    /// state in place until the next successful load.
    async fn resync(&mut self, customer: CustomerUuid) {
        match self.remote.fetch_lines(customer).await {
            Ok(stored) => match self.resolve_lines(stored).await {
                Ok(lines) => {
                    self.lines = lines;
                    info!("cart resynchronized from remote");
                }
                Err(error) => warn!(%error, "cart resync failed"),
            },
            Err(error) => warn!(%error, "cart resync failed"),
        }
    }
}
