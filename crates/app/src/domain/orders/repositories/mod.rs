//! Order repositories.

pub(crate) mod orders;

pub(crate) use orders::PgOrdersRepository;
