//! Crop lifecycle: death check and stage advancement.
//!
//! A crop moves `seed -> growing -> harvest` and then waits at `harvest`
//! until the player collects it. Each turn a planted tile first faces the
//! death check; only survivors advance.

use farmit_types::{Tile, TileType};

use crate::config::ZoneConfig;
use crate::phenology::PhenologyTable;

/// Whether the crop on `tile` dies this turn.
///
/// A crop dies when the soil moisture is below its zone's threshold and the
/// tile was not irrigated this turn. If `phenology` has a window for the
/// crop's type and stage, the crop also dies outside that window; irrigation
/// waives the moisture bounds but not the temperature bounds. Tiles without
/// a crop never die.
pub fn should_die(tile: &Tile, zones: &ZoneConfig, phenology: &PhenologyTable) -> bool {
    let Some(stage) = tile.crop else {
        return false;
    };
    let irrigated = tile.irrigated_this_step;
    if !irrigated && tile.humidity < zones.threshold(tile.zone_id) {
        return true;
    }
    let window = tile
        .crop_type
        .as_deref()
        .and_then(|crop| phenology.window(crop, stage));
    window.is_some_and(|w| {
        !w.tolerates_temperature(tile.temperature) || (!irrigated && !w.tolerates_moisture(tile.humidity))
    })
}

/// Destroy the crop on `tile`, leaving bare land.
pub fn kill_crop(tile: &mut Tile) {
    tile.clear_crop();
    tile.tile_type = TileType::Empty;
}

/// Count one turn of growth on `tile`.
///
/// The crop moves to its next stage once it has spent `interval` turns in
/// the current one. Returns `true` if the stage changed. A crop already at
/// harvest keeps its stage.
pub fn advance_crop(tile: &mut Tile, interval: u32) -> bool {
    let Some(stage) = tile.crop else {
        return false;
    };
    let next = stage.next();
    if next == stage {
        return false;
    }
    tile.stage_counter = tile.stage_counter.saturating_add(1);
    if tile.stage_counter < interval {
        return false;
    }
    tile.crop = Some(next);
    tile.stage_counter = 0;
    true
}
