//! Game initialization.

use chrono::Utc;
use farmit_types::{GameId, GameState, Player, Tile, TileId, TileType};
use farmit_world::{MapSource, TileGrid};
use tracing::info;

use crate::config::FarmConfig;
use crate::error::GameError;
use crate::session::GameSession;

/// Start a new game on a fresh map.
///
/// One tile is created per land cell, numbered from 1 in row-major order.
/// Every tile starts unowned with no crop; cells the map marks as forest
/// start as forest in conserve mode. The previous game, if any, is simply
/// replaced by the returned session.
pub fn new_game(map: &mut dyn MapSource, config: &FarmConfig) -> Result<GameSession, GameError> {
    config.validate()?;
    let land = map.land_map()?;
    let bounds = land.bounds();

    let mut tiles = Vec::with_capacity(land.land_count());
    let mut next_id: u32 = 1;
    for cell in land.cells() {
        let mut tile = Tile::new(
            TileId(next_id),
            cell.coord,
            cell.zone_id,
            cell.humidity,
            cell.temperature,
        );
        if cell.forest {
            tile.tile_type = TileType::Forest;
        }
        tiles.push(tile);
        next_id = next_id
            .checked_add(1)
            .ok_or(GameError::ArithmeticOverflow { field: "tile_id" })?;
    }
    let grid = TileGrid::from_tiles(bounds, tiles)?;

    let state = GameState {
        game_id: GameId::new(),
        current_step: 0,
        max_steps: config.game.max_steps,
        is_game_over: false,
        rows: bounds.rows(),
        cols: bounds.cols(),
        started_at: Utc::now(),
    };
    let player = Player {
        shovels: config.game.starting_shovels,
        drops: config.game.starting_drops,
        score: config.game.starting_score,
    };

    info!(
        game_id = %state.game_id,
        rows = state.rows,
        cols = state.cols,
        tiles = grid.len(),
        max_steps = state.max_steps,
        "Game started"
    );
    Ok(GameSession::new(state, player, grid))
}
