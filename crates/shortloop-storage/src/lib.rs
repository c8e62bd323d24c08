//! Repository backends for the shortloop URL shortener.
//!
//! Two interchangeable implementations of
//! [`Repository`](shortloop_core::Repository): an in-memory bidirectional
//! map pair and a transactional Postgres table.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;
