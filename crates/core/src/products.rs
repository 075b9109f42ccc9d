//! Products
//!
//! The catalog itself is owned elsewhere; this module holds the identity type
//! and the slice of catalog data the cart needs when a shopper adds a product.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::weight::WeightKey;

/// Catalog product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(i64);

impl ProductId {
    /// Wrap a raw catalog id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw catalog id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

/// A storefront selection handed to the cart: a product plus the weight
/// variant the shopper picked.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSelection {
    /// Catalog product id.
    pub product_id: ProductId,

    /// Catalog price: per kilogram for weighed goods, per piece otherwise.
    pub price: u64,

    /// Price already scaled for the selected weight, when known.
    pub unit_price: Option<u64>,

    /// Raw weight selector, e.g. `"250"`.
    pub weight: Option<String>,

    /// Measurement unit of the selector, e.g. `"grams"` or `"pieces"`.
    pub measurement_unit: Option<String>,
}

impl ProductSelection {
    /// The canonical cart line key for this selection.
    #[must_use]
    pub fn weight_key(&self) -> WeightKey {
        WeightKey::normalize(self.weight.as_deref(), self.measurement_unit.as_deref())
    }

    /// The unit price a new cart line takes for this selection: the
    /// pre-scaled price when present, the catalog price otherwise.
    #[must_use]
    pub fn effective_unit_price(&self) -> u64 {
        self.unit_price.unwrap_or(self.price)
    }
}
