//! Shopper identity
//!
//! Authentication itself is delegated to the platform's auth service; this
//! module only models the identity attached to the current session and the
//! boundary used to look it up.

pub mod models;
pub mod provider;

pub use models::{Customer, CustomerUuid, Identity};
pub use provider::*;
