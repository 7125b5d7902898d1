//! Read-only snapshots of a game for display.

use farmit_types::{GameView, PlayerView, TileView};
use farmit_world::{HazardThresholds, MAP_LAYERS};

use crate::session::GameSession;

/// Player resources together with the tiles they own.
pub fn player_view(session: &GameSession) -> PlayerView {
    PlayerView {
        shovels: session.player.shovels,
        drops: session.player.drops,
        score: session.player.score,
        tiles_owned: session.owned_tile_ids(),
    }
}

/// Full board snapshot. Each tile carries the hazard its own readings
/// indicate.
pub fn game_view(session: &GameSession, hazards: &HazardThresholds) -> GameView {
    let tiles = session
        .tiles()
        .iter()
        .map(|tile| TileView {
            event: hazards.classify(tile.temperature, tile.humidity),
            tile: tile.clone(),
        })
        .collect();
    GameView {
        game_id: session.state.game_id,
        step: session.state.current_step,
        max_steps: session.state.max_steps,
        is_game_over: session.state.is_game_over,
        player: player_view(session),
        tiles,
        map_shape: [session.state.rows, session.state.cols],
        map_layers: MAP_LAYERS.iter().map(|&name| name.to_owned()).collect(),
    }
}
