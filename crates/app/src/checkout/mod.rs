//! Checkout flow.
//!
//! Combines the cart store, the at-most-one applied promo code and the
//! shipping policy into a single billing snapshot. Recomputation is
//! explicit: every mutating operation ends in [`Checkout::recompute`], which
//! re-validates the applied promo from scratch and replaces the snapshot
//! wholesale, so the four billing fields are always mutually consistent.

use std::sync::Arc;

use jiff::Timestamp;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use tally::{
    billing::{self, BillingSnapshot, ShippingPolicy},
    pricing::PricingError,
    products::{ProductId, ProductSelection},
    promos,
    promos::PromoCode,
    weight::WeightKey,
};

use crate::domain::{
    carts::{CartStore, CartStoreError},
    orders::{NewOrder, OrderRecord, OrderUuid, OrdersService, OrdersServiceError},
    promos::{PromoCatalog, PromoServiceError},
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Cart(#[from] CartStoreError),

    #[error(transparent)]
    Promo(#[from] PromoServiceError),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Order placement attempted without a signed-in customer.
    #[error("sign in to place an order")]
    IdentityRequired,
}

pub struct Checkout {
    store: CartStore,
    promo_catalog: Arc<dyn PromoCatalog>,
    orders: Arc<dyn OrdersService>,
    shipping: ShippingPolicy,
    applied: Option<PromoCode>,
    /// First-order eligibility, cached when a promo is applied so the
    /// synchronous recompute path can re-validate without a remote call.
    first_order: Option<bool>,
    snapshot: BillingSnapshot,
}

impl Checkout {
    #[must_use]
    pub fn new(
        store: CartStore,
        promo_catalog: Arc<dyn PromoCatalog>,
        orders: Arc<dyn OrdersService>,
        shipping: ShippingPolicy,
    ) -> Self {
        Self {
            store,
            promo_catalog,
            orders,
            shipping,
            applied: None,
            first_order: None,
            snapshot: BillingSnapshot::default(),
        }
    }

    /// The underlying cart store.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// The current billing snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BillingSnapshot {
        self.snapshot
    }

    /// The currently applied promo code, if any.
    #[must_use]
    pub fn applied_code(&self) -> Option<&str> {
        self.applied.as_ref().map(|promo| promo.code.as_str())
    }

    /// Load the cart and compute the initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the remote load fails.
    pub async fn load(&mut self, now: Timestamp) -> Result<(), CheckoutError> {
        let result = self.store.load().await;
        self.recompute(now)?;
        result?;

        Ok(())
    }

    /// Add a catalog selection to the cart and refresh the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the store's error after the snapshot has been refreshed
    /// against whatever state the store settled on.
    pub async fn add_item(
        &mut self,
        selection: &ProductSelection,
        quantity: u32,
        now: Timestamp,
    ) -> Result<(), CheckoutError> {
        // A failed write has already resynchronized the store, so the
        // snapshot follows whatever state it settled on before the error
        // surfaces.
        let result = self.store.add(selection, quantity).await;
        self.recompute(now)?;
        result?;

        Ok(())
    }

    /// Remove a line and refresh the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the store's error after the snapshot has been refreshed.
    pub async fn remove_item(
        &mut self,
        product: ProductId,
        weight_key: &WeightKey,
        now: Timestamp,
    ) -> Result<(), CheckoutError> {
        let result = self.store.remove(product, weight_key).await;
        self.recompute(now)?;
        result?;

        Ok(())
    }

    /// Change a line's quantity and refresh the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the store's error after the snapshot has been refreshed.
    pub async fn update_quantity(
        &mut self,
        product: ProductId,
        weight_key: &WeightKey,
        quantity: i64,
        now: Timestamp,
    ) -> Result<(), CheckoutError> {
        let result = self.store.update_quantity(product, weight_key, quantity).await;
        self.recompute(now)?;
        result?;

        Ok(())
    }

    /// Empty the cart and refresh the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the store's error after the snapshot has been refreshed.
    pub async fn clear(&mut self, now: Timestamp) -> Result<(), CheckoutError> {
        let result = self.store.clear().await;
        self.recompute(now)?;
        result?;

        Ok(())
    }

    /// Apply a promo code to the cart.
    ///
    /// Looks the code up case-insensitively, derives first-order
    /// eligibility for a signed-in customer (unknown for guests), and
    /// validates the code against the current subtotal. On success the
    /// discount is returned and folded into the snapshot; any rejection
    /// clears the applied-promo state and surfaces the structured reason.
    ///
    /// # Errors
    ///
    /// [`PromoServiceError::NotFound`] for an unknown code,
    /// [`PromoServiceError::Rejected`] with the failing check otherwise.
    #[tracing::instrument(name = "checkout.apply_code", skip(self), err)]
    pub async fn apply_code(&mut self, code: &str, now: Timestamp) -> Result<u64, CheckoutError> {
        let record = self
            .promo_catalog
            .find_by_code(code)
            .await?
            .ok_or(PromoServiceError::NotFound)?;

        let promo = record.into_promo()?;

        let first_order = match self.store.identity().customer() {
            Some(customer) => Some(self.orders.count_orders(customer).await? == 0),
            None => None,
        };

        let subtotal = self.store.subtotal()?;

        match promos::evaluate(&promo, subtotal, first_order, now) {
            Ok(discount) => {
                self.applied = Some(promo);
                self.first_order = first_order;
                self.recompute(now)?;

                Ok(discount)
            }
            Err(rejection) => {
                self.applied = None;
                self.first_order = None;
                self.recompute(now)?;

                Err(PromoServiceError::Rejected(rejection).into())
            }
        }
    }

    /// Remove the applied promo code, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot recomputation fails.
    pub fn remove_code(&mut self, now: Timestamp) -> Result<(), CheckoutError> {
        self.applied = None;
        self.first_order = None;
        self.recompute(now)
    }

    /// Recompute the billing snapshot from the current cart state.
    ///
    /// The applied promo is re-validated from scratch on every call; a
    /// promo that no longer qualifies (say the subtotal fell below its
    /// minimum) is silently cleared rather than left stale.
    ///
    /// # Errors
    ///
    /// Returns an error when subtotal arithmetic overflows.
    pub fn recompute(&mut self, now: Timestamp) -> Result<(), CheckoutError> {
        let subtotal = self.store.subtotal()?;

        let mut discount = 0;
        let mut clear_applied = false;

        if let Some(promo) = &self.applied {
            match promos::evaluate(promo, subtotal, self.first_order, now) {
                Ok(amount) => discount = amount,
                Err(reason) => {
                    info!(code = %promo.code, %reason, "applied promo no longer qualifies; clearing");
                    clear_applied = true;
                }
            }
        }

        if clear_applied {
            self.applied = None;
            self.first_order = None;
        }

        self.snapshot = billing::aggregate(subtotal, discount, &self.shipping);

        Ok(())
    }

    /// Finalize the current cart into a persisted order.
    ///
    /// Called after payment success is confirmed. Consumes the current
    /// snapshot and lines, places the order (which increments the promo
    /// usage count exactly once), then clears the cart and the applied
    /// promo.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::IdentityRequired`] for guests; otherwise the
    /// placement or cart-clear error.
    #[tracing::instrument(name = "checkout.place_order", skip(self), err)]
    pub async fn place_order(&mut self, now: Timestamp) -> Result<OrderRecord, CheckoutError> {
        let customer = self
            .store
            .identity()
            .customer()
            .ok_or(CheckoutError::IdentityRequired)?;

        self.recompute(now)?;

        let order = NewOrder {
            uuid: OrderUuid::from_uuid(Uuid::now_v7()),
            customer,
            lines: self.store.lines().to_vec(),
            billing: self.snapshot,
            promo_code: self.applied.as_ref().map(|promo| promo.code.clone()),
        };

        let record = self.orders.place_order(order).await?;

        self.store.clear().await?;
        self.applied = None;
        self.first_order = Some(false);
        self.recompute(now)?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use crate::domain::{
        carts::remote::MockCartRemote,
        catalog::MockCatalog,
        identity::{CustomerUuid, Identity},
        orders::MockOrdersService,
        promos::{MockPromoCatalog, PromoRecord},
    };
    use tally::promos::PromoRejection;

    use super::*;

    const POLICY: ShippingPolicy = ShippingPolicy::new(999, 49);

    fn now() -> Timestamp {
        "2026-06-15T10:00:00Z".parse().expect("timestamp should parse")
    }

    fn customer() -> CustomerUuid {
        CustomerUuid::from_uuid(Uuid::now_v7())
    }

    fn ten_percent_record(min_order_amount: u64) -> PromoRecord {
        PromoRecord {
            code: "SAVE10".to_owned(),
            kind: "percentage".to_owned(),
            value: 10.0,
            usage_count: 0,
            usage_limit: None,
            valid_from: "2026-01-01T00:00:00Z".parse().expect("timestamp should parse"),
            valid_to: "2026-12-31T23:59:59Z".parse().expect("timestamp should parse"),
            enabled: true,
            min_order_amount,
            first_order_only: false,
        }
    }

    fn selection(product: i64, weight: &str, unit_price: u64) -> ProductSelection {
        ProductSelection {
            product_id: ProductId::new(product),
            price: unit_price,
            unit_price: Some(unit_price),
            weight: Some(weight.to_owned()),
            measurement_unit: Some("grams".to_owned()),
        }
    }

    fn checkout_with(
        remote: MockCartRemote,
        promo_catalog: MockPromoCatalog,
        orders: MockOrdersService,
        identity: Identity,
    ) -> Checkout {
        let store = CartStore::new(Arc::new(remote), Arc::new(MockCatalog::new()), identity);

        Checkout::new(store, Arc::new(promo_catalog), Arc::new(orders), POLICY)
    }

    fn permissive_remote() -> MockCartRemote {
        let mut remote = MockCartRemote::new();
        remote.expect_upsert_line().returning(|_, _| Ok(()));
        remote.expect_delete_line().returning(|_, _, _| Ok(()));
        remote.expect_delete_all().returning(|_| Ok(()));
        remote
    }

    #[tokio::test]
    async fn applying_a_promo_folds_it_into_the_snapshot() {
        let mut promos = MockPromoCatalog::new();
        promos
            .expect_find_by_code()
            .returning(|_| Ok(Some(ten_percent_record(300))));

        let mut orders = MockOrdersService::new();
        orders.expect_count_orders().returning(|_| Ok(3));

        let mut checkout = checkout_with(
            permissive_remote(),
            promos,
            orders,
            Identity::Customer(customer()),
        );

        checkout
            .add_item(&selection(1, "500", 250), 2, now())
            .await
            .expect("add should succeed");

        let discount = checkout
            .apply_code("save10", now())
            .await
            .expect("promo should apply");

        assert_eq!(discount, 50);
        assert_eq!(
            checkout.snapshot(),
            BillingSnapshot {
                subtotal: 500,
                discount: 50,
                shipping_fee: 49,
                total: 499,
            }
        );
        assert_eq!(checkout.applied_code(), Some("SAVE10"));
    }

    #[tokio::test]
    async fn large_orders_ship_free() {
        let mut promos = MockPromoCatalog::new();
        promos
            .expect_find_by_code()
            .returning(|_| Ok(Some(ten_percent_record(300))));

        let mut orders = MockOrdersService::new();
        orders.expect_count_orders().returning(|_| Ok(1));

        let mut checkout = checkout_with(
            permissive_remote(),
            promos,
            orders,
            Identity::Customer(customer()),
        );

        checkout
            .add_item(&selection(1, "500", 250), 2, now())
            .await
            .expect("add should succeed");
        checkout
            .add_item(&selection(2, "default", 100), 7, now())
            .await
            .expect("add should succeed");

        checkout
            .apply_code("SAVE10", now())
            .await
            .expect("promo should apply");

        let snapshot = checkout.snapshot();

        assert_eq!(snapshot.subtotal, 1200);
        assert_eq!(snapshot.discount, 120);
        assert_eq!(snapshot.shipping_fee, 0);
        assert_eq!(snapshot.total, 1080);
    }

    #[tokio::test]
    async fn promo_is_cleared_when_the_subtotal_shrinks_below_its_minimum() {
        let mut promos = MockPromoCatalog::new();
        promos
            .expect_find_by_code()
            .returning(|_| Ok(Some(ten_percent_record(500))));

        let mut orders = MockOrdersService::new();
        orders.expect_count_orders().returning(|_| Ok(1));

        let mut checkout = checkout_with(
            permissive_remote(),
            promos,
            orders,
            Identity::Customer(customer()),
        );

        checkout
            .add_item(&selection(1, "500", 250), 2, now())
            .await
            .expect("add should succeed");
        checkout
            .add_item(&selection(2, "default", 100), 1, now())
            .await
            .expect("add should succeed");

        checkout
            .apply_code("SAVE10", now())
            .await
            .expect("promo should apply on a 600 subtotal");

        assert_eq!(checkout.snapshot().discount, 60);

        // Dropping the second line brings the subtotal to 400, below the
        // promo's 500 minimum: it is silently cleared.
        checkout
            .remove_item(ProductId::new(2), &WeightKey::from("default"), now())
            .await
            .expect("remove should succeed");

        assert_eq!(checkout.applied_code(), None);
        assert_eq!(
            checkout.snapshot(),
            BillingSnapshot {
                subtotal: 400,
                discount: 0,
                shipping_fee: 49,
                total: 449,
            }
        );
    }

    #[tokio::test]
    async fn unknown_codes_are_reported_as_not_found() {
        let mut promos = MockPromoCatalog::new();
        promos.expect_find_by_code().returning(|_| Ok(None));

        let mut checkout = checkout_with(
            permissive_remote(),
            promos,
            MockOrdersService::new(),
            Identity::Customer(customer()),
        );

        let result = checkout.apply_code("NOPE", now()).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Promo(PromoServiceError::NotFound))
        ));
    }

    #[tokio::test]
    async fn first_order_codes_require_a_signed_in_shopper() {
        let mut record = ten_percent_record(0);
        record.first_order_only = true;

        let mut promos = MockPromoCatalog::new();
        promos.expect_find_by_code().returning(move |_| Ok(Some(record.clone())));

        let mut checkout = checkout_with(
            MockCartRemote::new(),
            promos,
            MockOrdersService::new(),
            Identity::Guest,
        );

        let result = checkout.apply_code("SAVE10", now()).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Promo(PromoServiceError::Rejected(
                PromoRejection::RequiresLogin
            )))
        ));
        assert_eq!(checkout.applied_code(), None);
    }

    #[tokio::test]
    async fn first_order_codes_accept_a_customer_with_no_prior_orders() {
        let mut record = ten_percent_record(0);
        record.first_order_only = true;

        let mut promos = MockPromoCatalog::new();
        promos.expect_find_by_code().returning(move |_| Ok(Some(record.clone())));

        let mut orders = MockOrdersService::new();
        orders.expect_count_orders().times(1).returning(|_| Ok(0));

        let mut checkout = checkout_with(
            permissive_remote(),
            promos,
            orders,
            Identity::Customer(customer()),
        );

        checkout
            .add_item(&selection(1, "500", 250), 2, now())
            .await
            .expect("add should succeed");

        let discount = checkout
            .apply_code("SAVE10", now())
            .await
            .expect("promo should apply");

        assert_eq!(discount, 50);
    }

    #[tokio::test]
    async fn rejected_codes_clear_any_previously_applied_promo() {
        let good = ten_percent_record(0);
        let mut exhausted = ten_percent_record(0);
        exhausted.code = "DEAD".to_owned();
        exhausted.usage_count = 5;
        exhausted.usage_limit = Some(5);

        let mut promos = MockPromoCatalog::new();
        promos
            .expect_find_by_code()
            .withf(|code| code == "SAVE10")
            .returning(move |_| Ok(Some(good.clone())));
        promos
            .expect_find_by_code()
            .withf(|code| code == "DEAD")
            .returning(move |_| Ok(Some(exhausted.clone())));

        let mut orders = MockOrdersService::new();
        orders.expect_count_orders().returning(|_| Ok(1));

        let mut checkout = checkout_with(
            permissive_remote(),
            promos,
            orders,
            Identity::Customer(customer()),
        );

        checkout
            .add_item(&selection(1, "500", 250), 2, now())
            .await
            .expect("add should succeed");
        checkout
            .apply_code("SAVE10", now())
            .await
            .expect("first promo should apply");

        let result = checkout.apply_code("DEAD", now()).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Promo(PromoServiceError::Rejected(
                PromoRejection::UsageLimitReached
            )))
        ));
        assert_eq!(checkout.applied_code(), None);
        assert_eq!(checkout.snapshot().discount, 0);
    }

    #[tokio::test]
    async fn placing_an_order_hands_the_promo_code_to_finalization_once() {
        let mut promos = MockPromoCatalog::new();
        promos
            .expect_find_by_code()
            .returning(|_| Ok(Some(ten_percent_record(300))));

        let mut orders = MockOrdersService::new();
        orders.expect_count_orders().returning(|_| Ok(1));
        orders
            .expect_place_order()
            .withf(|order| {
                order.promo_code.as_deref() == Some("SAVE10")
                    && order.billing.total == 499
                    && order.lines.len() == 1
            })
            .times(1)
            .returning(|order| {
                Ok(OrderRecord {
                    uuid: order.uuid,
                    customer: order.customer,
                    subtotal: order.billing.subtotal,
                    discount: order.billing.discount,
                    shipping_fee: order.billing.shipping_fee,
                    total: order.billing.total,
                    promo_code: order.promo_code,
                    created_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut checkout = checkout_with(
            permissive_remote(),
            promos,
            orders,
            Identity::Customer(customer()),
        );

        checkout
            .add_item(&selection(1, "500", 250), 2, now())
            .await
            .expect("add should succeed");
        checkout
            .apply_code("SAVE10", now())
            .await
            .expect("promo should apply");

        let record = checkout
            .place_order(now())
            .await
            .expect("order should be placed");

        assert_eq!(record.total, 499);

        // Cart and applied promo are gone once the order is down.
        assert_eq!(checkout.store().line_count(), 0);
        assert_eq!(checkout.applied_code(), None);
        assert_eq!(checkout.snapshot().subtotal, 0);
    }

    #[tokio::test]
    async fn guests_cannot_place_orders() {
        let mut checkout = checkout_with(
            MockCartRemote::new(),
            MockPromoCatalog::new(),
            MockOrdersService::new(),
            Identity::Guest,
        );

        let result = checkout.place_order(now()).await;

        assert!(matches!(result, Err(CheckoutError::IdentityRequired)));
    }
}
