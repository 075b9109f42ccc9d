//! Promo repositories.

pub(crate) mod promos;

pub(crate) use promos::PgPromosRepository;
