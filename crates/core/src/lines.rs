//! Cart line items

use serde::{Deserialize, Serialize};

use crate::{products::ProductId, weight::WeightKey};

/// One product-and-weight combination and its quantity within a cart.
///
/// At most one line exists per `(product_id, weight_key)` pair; duplicates
/// are merged by summing quantities. The unit price is already scaled for
/// the selected weight, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product id.
    pub product_id: ProductId,

    /// Canonical weight key for this line.
    pub weight_key: WeightKey,

    /// Number of units; always at least one (zero-quantity lines are
    /// removed, never kept).
    pub quantity: u32,

    /// Price per unit at the selected weight, in whole currency units.
    pub unit_price: u64,
}

impl CartLine {
    /// Create a new line.
    #[must_use]
    pub const fn new(
        product_id: ProductId,
        weight_key: WeightKey,
        quantity: u32,
        unit_price: u64,
    ) -> Self {
        Self {
            product_id,
            weight_key,
            quantity,
            unit_price,
        }
    }

    /// Whether this line holds the given product/weight pair.
    #[must_use]
    pub fn matches(&self, product_id: ProductId, weight_key: &WeightKey) -> bool {
        self.product_id == product_id && self.weight_key == *weight_key
    }
}

/// Combine a previously-guest local cart with a freshly fetched remote cart.
///
/// Lines are grouped by `(product, weight)` pair: where both sides hold a
/// line the quantities are summed and the persisted unit price wins; a line
/// present on only one side is kept as-is. Remote ordering is preserved and
/// local-only lines append in their original order.
#[must_use]
pub fn merge_lines(remote: &[CartLine], local: &[CartLine]) -> Vec<CartLine> {
    let mut merged = remote.to_vec();

    for line in local {
        match merged
            .iter_mut()
            .find(|existing| existing.matches(line.product_id, &line.weight_key))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => merged.push(line.clone()),
        }
    }

    merged
}
