//! Identifier types for games and tiles.
//!
//! A game instance is identified by a UUID v7 so restarts produce a fresh,
//! time-ordered identifier that can be correlated across logs and storage.
//! Tiles are identified by a small integer assigned in row-major order when
//! the island is generated; the frontend addresses tiles by this number.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for one game instance.
///
/// Regenerated every time a game is (re)started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameId(pub Uuid);

impl GameId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for GameId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for GameId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Stable identifier of a land tile.
///
/// Ids start at 1 and are assigned in row-major order over land cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct TileId(pub u32);

impl TileId {
    /// Return the raw numeric id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for TileId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TileId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_ids_are_unique() {
        let a = GameId::new();
        let b = GameId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }

    #[test]
    fn tile_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&TileId(5)).ok();
        assert_eq!(json.as_deref(), Some("5"));
    }

    #[test]
    fn tile_id_display() {
        assert_eq!(TileId(42).to_string(), "42");
    }
}
