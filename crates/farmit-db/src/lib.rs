//! Storage for Farm It games (in-memory or `PostgreSQL`).
//!
//! Game mechanics in `farmit-core` are synchronous and work on a
//! [`GameSession`](farmit_core::GameSession). This crate loads that session,
//! runs one operation on it, and writes the result back as a single atomic
//! unit.
//!
//! # Architecture
//!
//! ```text
//! GameStore::transact(op)
//!     |
//!     +-- Memory   --> clone session, run op, swap on success
//!     |
//!     +-- Postgres --> BEGIN, load FOR UPDATE, run op,
//!                      write state + player + touched tiles, COMMIT
//! ```
//!
//! # Modules
//!
//! - [`store`] -- [`GameStore`], the backend-agnostic handle
//! - [`memory`] -- In-process store
//! - [`game_store`] -- `PostgreSQL` game persistence
//! - [`postgres`] -- `PostgreSQL` pool: connect, migrate, slot check
//! - [`error`] -- Shared error types

pub mod error;
pub mod game_store;
pub mod memory;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use game_store::PgGameStore;
pub use memory::MemoryStore;
pub use postgres::{PostgresPool, StoredGame};
pub use store::GameStore;
