//! Orders
//!
//! Order finalization: the downstream consumer of a billing snapshot. An
//! order is persisted after payment success is confirmed, and the applied
//! promo's usage count is incremented exactly once, in the same transaction.

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use data::NewOrder;
pub use errors::OrdersServiceError;
pub use records::{OrderRecord, OrderUuid};
pub use service::*;
