//! Error types for the storage layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors and the game errors raised by operations running inside
//! a store transaction.

use farmit_core::GameError;

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value cannot be turned back into a game entity.
    #[error("Corrupt stored data: {0}")]
    Corrupt(String),

    /// The operation run inside the transaction failed. Nothing was written.
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
