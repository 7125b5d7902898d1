//! The explicit game context every operation works on.
//!
//! A [`GameSession`] bundles the game state, the player and the tile grid of
//! one game. Operations take it by `&mut` instead of reaching for shared
//! singletons, so a store can load it, hand it to an operation, and write
//! back exactly what changed.

use std::collections::BTreeSet;

use farmit_types::{GameState, Player, Tile, TileId};
use farmit_world::TileGrid;

/// State of one running game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    /// Turn counter and bounds.
    pub state: GameState,
    /// Player resources.
    pub player: Player,
    /// All land tiles.
    tiles: TileGrid,
    /// Tiles handed out for mutation since the last [`take_touched`](Self::take_touched).
    touched: BTreeSet<TileId>,
}

impl GameSession {
    /// Assemble a session from its parts. No tile is marked as touched.
    pub const fn new(state: GameState, player: Player, tiles: TileGrid) -> Self {
        Self {
            state,
            player,
            tiles,
            touched: BTreeSet::new(),
        }
    }

    /// The tile grid.
    pub const fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    /// Look up a tile.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Look up a tile for mutation and mark it as touched.
    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        let tile = self.tiles.get_mut(id)?;
        self.touched.insert(id);
        Some(tile)
    }

    /// The whole grid for mutation. Every tile is marked as touched.
    pub fn tiles_mut(&mut self) -> &mut TileGrid {
        self.touched.extend(self.tiles.ids());
        &mut self.tiles
    }

    /// Tiles handed out for mutation so far.
    pub const fn touched(&self) -> &BTreeSet<TileId> {
        &self.touched
    }

    /// Return and clear the set of touched tiles.
    pub fn take_touched(&mut self) -> BTreeSet<TileId> {
        std::mem::take(&mut self.touched)
    }

    /// Ids of the tiles the player owns, ascending.
    pub fn owned_tile_ids(&self) -> Vec<TileId> {
        self.tiles
            .iter()
            .filter(|t| t.is_owned_by_player())
            .map(|t| t.id)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use farmit_types::{GameId, GridCoord, Owner};
    use farmit_world::GridBounds;

    use super::*;

    fn session() -> GameSession {
        let bounds = GridBounds::new(1, 3).unwrap();
        let tiles = TileGrid::from_tiles(
            bounds,
            (0..3).map(|c| Tile::new(TileId(c + 1), GridCoord::new(0, c), 1, 0.3, 12.0)),
        )
        .unwrap();
        let state = GameState {
            game_id: GameId::new(),
            current_step: 0,
            max_steps: 10,
            is_game_over: false,
            rows: 1,
            cols: 3,
            started_at: Utc::now(),
        };
        GameSession::new(state, Player::default(), tiles)
    }

    #[test]
    fn tile_mut_marks_touched() {
        let mut s = session();
        assert!(s.touched().is_empty());
        s.tile_mut(TileId(2)).unwrap().owner = Some(Owner::Player);
        assert!(s.tile_mut(TileId(9)).is_none());
        assert_eq!(s.take_touched().into_iter().collect::<Vec<_>>(), vec![TileId(2)]);
        assert!(s.touched().is_empty());
        assert_eq!(s.owned_tile_ids(), vec![TileId(2)]);
    }

    #[test]
    fn tiles_mut_marks_everything() {
        let mut s = session();
        let _ = s.tiles_mut();
        assert_eq!(s.touched().len(), 3);
    }
}
