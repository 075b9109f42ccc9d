//! Cart repositories.

pub(crate) mod lines;

pub(crate) use lines::PgCartLinesRepository;
