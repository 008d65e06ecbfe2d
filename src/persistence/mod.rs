//! Persistence layer: storage contract and PostgreSQL implementation.
//!
//! The [`SwapStore`] trait abstracts the transactional store the
//! coordinator relies on. The concrete implementation uses `sqlx::PgPool`
//! for async PostgreSQL access; an in-memory implementation with the same
//! semantics backs the coordinator tests.

pub mod models;
pub mod postgres;
pub mod store;

#[cfg(test)]
pub mod memory;

pub use postgres::PgSwapStore;
pub use store::SwapStore;
