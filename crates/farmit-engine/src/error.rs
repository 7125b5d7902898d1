//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and while serving commands.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: farmit_core::ConfigError,
    },

    /// Map construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: farmit_world::WorldError,
    },

    /// A game operation failed.
    #[error("game error: {source}")]
    Game {
        /// The underlying game error.
        #[from]
        source: farmit_core::GameError,
    },

    /// The store failed.
    #[error("storage error: {source}")]
    Db {
        /// The underlying storage error.
        #[from]
        source: farmit_db::DbError,
    },

    /// The weather archive could not be queried.
    #[error("weather error: {message}")]
    Weather {
        /// Description of the weather failure.
        message: String,
    },

    /// Reading commands or writing replies failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A reply could not be serialized.
    #[error("serialization error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
