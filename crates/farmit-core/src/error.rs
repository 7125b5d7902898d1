//! Error types for the `farmit-core` crate.
//!
//! Rule violations (unaffordable action, wrong tile state, ...) are not
//! errors: they come back as rejected [`ActionResult`]s. [`GameError`] is
//! reserved for failures that abort the whole call.
//!
//! [`ActionResult`]: farmit_types::ActionResult

/// Errors that abort a game operation.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// No game has been started.
    #[error("game not initialized")]
    NotInitialized,

    /// A counter would leave the range of its type.
    #[error("arithmetic overflow while updating {field}")]
    ArithmeticOverflow {
        /// Name of the counter being updated.
        field: &'static str,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: farmit_world::WorldError,
    },

    /// The configuration is unusable.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: crate::config::ConfigError,
    },
}

/// Add `amount` to `value`, reporting overflow against `field`.
pub(crate) fn checked_add(value: u32, amount: u32, field: &'static str) -> Result<u32, GameError> {
    value
        .checked_add(amount)
        .ok_or(GameError::ArithmeticOverflow { field })
}
