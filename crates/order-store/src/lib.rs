//! Storage backends for the storefront.
//!
//! Implements the `domain` storage ports twice: an in-memory backend for
//! tests and default runtime, and a PostgreSQL backend via sqlx. Both
//! honor the same conditional-write contract for status mutation.

mod memory;
mod postgres;

pub use memory::{InMemoryCatalog, InMemoryOrderStore};
pub use postgres::{PostgresCatalog, PostgresOrderStore};
