//! Error types for the `farmit-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use farmit_types::{GridCoord, TileId};

/// Errors that can occur while building or querying the island.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The grid has a zero dimension.
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        cols: u32,
    },

    /// A coordinate lies outside the grid.
    #[error("coordinate {coord} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        /// The offending coordinate.
        coord: GridCoord,
        /// Grid height.
        rows: u32,
        /// Grid width.
        cols: u32,
    },

    /// Two tiles were inserted at the same grid position.
    #[error("duplicate tile at {coord} (tiles {existing} and {incoming})")]
    DuplicateCoordinate {
        /// The contested coordinate.
        coord: GridCoord,
        /// Tile already occupying the coordinate.
        existing: TileId,
        /// Tile that was rejected.
        incoming: TileId,
    },

    /// Two tiles were inserted with the same id.
    #[error("duplicate tile id: {0}")]
    DuplicateTile(TileId),

    /// A land layer does not match the grid shape.
    #[error("map layer has {actual} cells, expected {expected}")]
    LayerShape {
        /// Cells required by the grid.
        expected: usize,
        /// Cells supplied.
        actual: usize,
    },

    /// Island generation parameters are out of range.
    #[error("invalid island parameters: {reason}")]
    InvalidIsland {
        /// What was wrong.
        reason: String,
    },

    /// No weather reading exists for the requested step.
    #[error("weather data unavailable for step {step}")]
    WeatherUnavailable {
        /// The step that was requested.
        step: u32,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
