//! Catalog
//!
//! Read-only view of the product catalog. The catalog is owned by the admin
//! subsystem; the cart only needs per-product prices, mainly to reprice
//! persisted lines that predate unit-price caching.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use records::ProductRecord;
pub use service::*;
