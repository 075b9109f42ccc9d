//! Carts

pub mod errors;
pub mod records;
pub mod remote;
mod repositories;
pub mod store;

pub use errors::CartStoreError;
pub use remote::*;
pub use store::CartStore;
