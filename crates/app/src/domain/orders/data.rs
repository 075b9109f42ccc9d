//! Order Data

use tally::{billing::BillingSnapshot, lines::CartLine};

use crate::domain::{identity::CustomerUuid, orders::records::OrderUuid};

/// New Order Data
///
/// Everything order finalization needs: the final cart lines, the billing
/// snapshot they were priced under, and the promo code that produced the
/// discount (if any).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub customer: CustomerUuid,
    pub lines: Vec<CartLine>,
    pub billing: BillingSnapshot,
    pub promo_code: Option<String>,
}
