//! Core entity structs: game state, player, tiles, and read views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CropState, ExploitMode, HazardEvent, Owner, TileType};
use crate::ids::{GameId, TileId};

// ---------------------------------------------------------------------------
// Grid coordinates
// ---------------------------------------------------------------------------

/// Position of a tile on the map grid.
///
/// Ordered row-major so a `BTreeMap<GridCoord, _>` iterates the map the way
/// it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridCoord {
    /// Row index (`grid_i`), 0 at the top.
    pub row: u32,
    /// Column index (`grid_j`), 0 at the left.
    pub col: u32,
}

impl GridCoord {
    /// Create a coordinate.
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl core::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Singletons
// ---------------------------------------------------------------------------

/// Turn counter and bounds of a single game instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Identifier of this game instance.
    pub game_id: GameId,
    /// Number of turns played so far.
    pub current_step: u32,
    /// Turn at which the game ends.
    pub max_steps: u32,
    /// Set once `current_step` reaches `max_steps`. Never reverts.
    pub is_game_over: bool,
    /// Map height in cells.
    pub rows: u32,
    /// Map width in cells.
    pub cols: u32,
    /// When the game was started.
    pub started_at: DateTime<Utc>,
}

/// Resources held by the player.
///
/// All counters are unsigned: an action that would make one negative is
/// rejected instead of clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// Shovels, spent on buying land and firebreaks.
    pub shovels: u32,
    /// Water drops, spent on irrigation and water reserves.
    pub drops: u32,
    /// Accumulated score.
    pub score: u32,
}

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// One land cell of the island.
///
/// Tiles are created in bulk when a game starts and never individually
/// created or deleted afterwards; only their mutable fields change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tile {
    /// Stable identifier.
    pub id: TileId,
    /// Unique grid position.
    pub coord: GridCoord,
    /// Climate zone id, selects the humidity death threshold.
    pub zone_id: u32,
    /// What occupies the tile.
    pub tile_type: TileType,
    /// Current owner, if any.
    pub owner: Option<Owner>,
    /// Crop growth stage. Only ever set on fields.
    pub crop: Option<CropState>,
    /// Free-form crop name recorded at planting.
    pub crop_type: Option<String>,
    /// Turns spent in the current crop stage.
    pub stage_counter: u32,
    /// Whether a water reserve has been built here.
    pub has_water_reserve: bool,
    /// Whether a firebreak has been built here.
    pub has_firebreak: bool,
    /// Latest soil temperature reading.
    pub temperature: f64,
    /// Latest soil moisture reading.
    pub humidity: f64,
    /// Step of the last irrigation, `None` if never irrigated.
    pub last_irrigated_step: Option<u32>,
    /// Whether the tile was irrigated during the current turn.
    pub irrigated_this_step: bool,
    /// Forest management mode. Meaningful for forests only.
    pub exploited: ExploitMode,
}

impl Tile {
    /// Create an unowned empty tile with the given initial climate readings.
    pub const fn new(
        id: TileId,
        coord: GridCoord,
        zone_id: u32,
        humidity: f64,
        temperature: f64,
    ) -> Self {
        Self {
            id,
            coord,
            zone_id,
            tile_type: TileType::Empty,
            owner: None,
            crop: None,
            crop_type: None,
            stage_counter: 0,
            has_water_reserve: false,
            has_firebreak: false,
            temperature,
            humidity,
            last_irrigated_step: None,
            irrigated_this_step: false,
            exploited: ExploitMode::Conserve,
        }
    }

    /// Whether the player owns this tile.
    pub fn is_owned_by_player(&self) -> bool {
        self.owner == Some(Owner::Player)
    }

    /// Whether this tile is a field with a crop on it.
    pub fn is_planted(&self) -> bool {
        self.tile_type == TileType::Field && self.crop.is_some()
    }

    /// Whether this tile is a forest left in conserve mode.
    pub fn is_conserved_forest(&self) -> bool {
        self.tile_type == TileType::Forest && self.exploited == ExploitMode::Conserve
    }

    /// Remove the crop and any growth progress.
    pub fn clear_crop(&mut self) {
        self.crop = None;
        self.crop_type = None;
        self.stage_counter = 0;
    }
}

// ---------------------------------------------------------------------------
// Read views
// ---------------------------------------------------------------------------

/// Player resources plus the ids of the tiles they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerView {
    /// Shovels owned.
    pub shovels: u32,
    /// Water drops owned.
    pub drops: u32,
    /// Current score.
    pub score: u32,
    /// Ids of owned tiles, ascending.
    pub tiles_owned: Vec<TileId>,
}

/// A tile together with the hazard its current readings indicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TileView {
    /// The tile record.
    #[serde(flatten)]
    pub tile: Tile,
    /// Hazard derived from the tile's temperature and humidity.
    pub event: Option<HazardEvent>,
}

/// Complete snapshot of a game, enough to render the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameView {
    /// Identifier of the game instance.
    pub game_id: GameId,
    /// Current turn.
    pub step: u32,
    /// Last turn.
    pub max_steps: u32,
    /// Whether the game has ended.
    pub is_game_over: bool,
    /// Player resources.
    pub player: PlayerView,
    /// All tiles, ascending by id.
    pub tiles: Vec<TileView>,
    /// Map dimensions `[rows, cols]`.
    pub map_shape: [u32; 2],
    /// Names of the map layers the board was generated from.
    pub map_layers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tile() -> Tile {
        Tile::new(TileId(1), GridCoord::new(0, 0), 1, 0.3, 12.0)
    }

    #[test]
    fn new_tile_defaults() {
        let tile = sample_tile();
        assert_eq!(tile.tile_type, TileType::Empty);
        assert!(tile.owner.is_none());
        assert!(tile.crop.is_none());
        assert_eq!(tile.last_irrigated_step, None);
        assert_eq!(tile.exploited, ExploitMode::Conserve);
    }

    #[test]
    fn planted_requires_field_and_crop() {
        let mut tile = sample_tile();
        assert!(!tile.is_planted());
        tile.tile_type = TileType::Field;
        assert!(!tile.is_planted());
        tile.crop = Some(CropState::Seed);
        assert!(tile.is_planted());
    }

    #[test]
    fn clear_crop_resets_progress() {
        let mut tile = sample_tile();
        tile.tile_type = TileType::Field;
        tile.crop = Some(CropState::Growing);
        tile.crop_type = Some("wheat".to_owned());
        tile.stage_counter = 2;
        tile.clear_crop();
        assert!(tile.crop.is_none());
        assert!(tile.crop_type.is_none());
        assert_eq!(tile.stage_counter, 0);
        assert_eq!(tile.tile_type, TileType::Field);
    }

    #[test]
    fn tile_view_flattens_tile_fields() {
        let view = TileView {
            tile: sample_tile(),
            event: Some(HazardEvent::Drought),
        };
        let json = serde_json::to_value(&view).ok();
        let json = json.unwrap_or(serde_json::Value::Null);
        assert_eq!(json.get("tile_type"), Some(&serde_json::json!("empty")));
        assert_eq!(json.get("event"), Some(&serde_json::json!("Drought")));
    }
}
