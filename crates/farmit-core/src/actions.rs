//! Player actions on single tiles.
//!
//! Each action checks its preconditions in a fixed order (tile exists,
//! ownership, tile state, resources) and stops at the first failure, which
//! becomes the rejection message. Manual irrigation is the exception: it
//! checks the drop balance before looking at ownership.
//!
//! Nothing is mutated on rejection. On success the player is debited and
//! the tile updated in place through the [`GameSession`].

use farmit_types::{
    ActionKind, ActionResult, BuyDetails, CropState, ExploitMode, FirebreakDetails,
    ForestModeDetails, HarvestDetails, IrrigateDetails, Owner, PlantDetails, RejectionReason,
    TileId, TileType, WaterReserveDetails,
};
use tracing::debug;

use crate::config::FarmConfig;
use crate::error::{GameError, checked_add};
use crate::session::GameSession;

/// Shorthand for the return type of every action.
pub type ActionOutcome<D> = Result<ActionResult<D>, GameError>;

fn not_found<D>(tile_id: TileId) -> ActionResult<D> {
    ActionResult::rejected(
        RejectionReason::TileNotFound,
        format!("Tile {tile_id} not found"),
    )
}

const fn plural(count: u32, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

/// Log and return a rejection.
fn reject<D>(action: ActionKind, tile_id: TileId, result: ActionResult<D>) -> ActionOutcome<D> {
    debug!(%action, tile_id = tile_id.get(), reason = %result.message, "Action rejected");
    Ok(result)
}

// ---------------------------------------------------------------------------
// Land
// ---------------------------------------------------------------------------

/// Buy an unowned tile.
pub fn buy(session: &mut GameSession, config: &FarmConfig, tile_id: TileId) -> ActionOutcome<BuyDetails> {
    const ACTION: ActionKind = ActionKind::Buy;
    let Some(tile) = session.tile(tile_id) else {
        return reject(ACTION, tile_id, not_found(tile_id));
    };
    if tile.owner.is_some() {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(RejectionReason::TileAlreadyOwned, "Tile is already owned"),
        );
    }
    let Some(shovels) = session.player.shovels.checked_sub(config.costs.buy_shovels) else {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(
                RejectionReason::InsufficientResources,
                "Not enough shovels to buy tile",
            ),
        );
    };

    session.player.shovels = shovels;
    if let Some(tile) = session.tile_mut(tile_id) {
        tile.owner = Some(Owner::Player);
    }
    debug!(tile_id = tile_id.get(), shovels, "Tile bought");
    Ok(ActionResult::succeeded(
        "Tile purchased successfully",
        BuyDetails {
            tile_id,
            shovels_remaining: shovels,
        },
    ))
}

/// Plant a crop on an owned empty tile or field.
pub fn plant(session: &mut GameSession, tile_id: TileId, crop_type: &str) -> ActionOutcome<PlantDetails> {
    const ACTION: ActionKind = ActionKind::Plant;
    let Some(tile) = session.tile(tile_id) else {
        return reject(ACTION, tile_id, not_found(tile_id));
    };
    if !tile.is_owned_by_player() {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(
                RejectionReason::TileNotOwned,
                "Tile must be owned by player to plant crops",
            ),
        );
    }
    if tile.tile_type == TileType::Forest {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(
                RejectionReason::InvalidTileState,
                format!("Cannot plant on {} tile. Must be empty or field.", tile.tile_type),
            ),
        );
    }
    if tile.crop.is_some() {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(RejectionReason::InvalidTileState, "Tile already has a crop"),
        );
    }

    if let Some(tile) = session.tile_mut(tile_id) {
        tile.tile_type = TileType::Field;
        tile.crop = Some(CropState::Seed);
        tile.crop_type = Some(crop_type.to_owned());
        tile.stage_counter = 0;
    }
    debug!(tile_id = tile_id.get(), crop_type, "Crop planted");
    Ok(ActionResult::succeeded(
        "Crop planted successfully",
        PlantDetails {
            tile_id,
            crop_type: crop_type.to_owned(),
        },
    ))
}

// ---------------------------------------------------------------------------
// Improvements
// ---------------------------------------------------------------------------

/// Build a water reserve on an owned tile.
pub fn build_water_reserve(
    session: &mut GameSession,
    config: &FarmConfig,
    tile_id: TileId,
) -> ActionOutcome<WaterReserveDetails> {
    const ACTION: ActionKind = ActionKind::BuildWaterReserve;
    let cost = config.costs.water_reserve_drops;
    let Some(tile) = session.tile(tile_id) else {
        return reject(ACTION, tile_id, not_found(tile_id));
    };
    if !tile.is_owned_by_player() {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(RejectionReason::TileNotOwned, "Tile must be owned by player"),
        );
    }
    if tile.has_water_reserve {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(
                RejectionReason::InvalidTileState,
                "Tile already has a water reserve",
            ),
        );
    }
    let Some(drops) = session.player.drops.checked_sub(cost) else {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(
                RejectionReason::InsufficientResources,
                format!(
                    "Not enough water drops. Water reserve costs {cost} {}.",
                    plural(cost, "drop", "drops")
                ),
            ),
        );
    };

    session.player.drops = drops;
    if let Some(tile) = session.tile_mut(tile_id) {
        tile.has_water_reserve = true;
    }
    debug!(tile_id = tile_id.get(), drops, "Water reserve built");
    Ok(ActionResult::succeeded(
        "Water reserve built successfully",
        WaterReserveDetails {
            tile_id,
            drops_remaining: drops,
        },
    ))
}

/// Build a firebreak on an owned tile.
pub fn build_firebreak(
    session: &mut GameSession,
    config: &FarmConfig,
    tile_id: TileId,
) -> ActionOutcome<FirebreakDetails> {
    const ACTION: ActionKind = ActionKind::BuildFirebreak;
    let cost = config.costs.firebreak_shovels;
    let Some(tile) = session.tile(tile_id) else {
        return reject(ACTION, tile_id, not_found(tile_id));
    };
    if !tile.is_owned_by_player() {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(RejectionReason::TileNotOwned, "Tile must be owned by player"),
        );
    }
    if tile.has_firebreak {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(RejectionReason::InvalidTileState, "Tile already has a firebreak"),
        );
    }
    let Some(shovels) = session.player.shovels.checked_sub(cost) else {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(
                RejectionReason::InsufficientResources,
                format!(
                    "Not enough shovels. Firebreak costs {cost} {}.",
                    plural(cost, "shovel", "shovels")
                ),
            ),
        );
    };

    session.player.shovels = shovels;
    if let Some(tile) = session.tile_mut(tile_id) {
        tile.has_firebreak = true;
    }
    debug!(tile_id = tile_id.get(), shovels, "Firebreak built");
    Ok(ActionResult::succeeded(
        "Firebreak built successfully",
        FirebreakDetails {
            tile_id,
            shovels_remaining: shovels,
        },
    ))
}

/// Switch an owned forest between conserve and exploit.
///
/// `mode` is parsed after the tile checks, so an unknown mode on a missing
/// or foreign tile reports the tile problem first. Setting the mode a
/// forest already has succeeds.
pub fn set_forest_exploitation(
    session: &mut GameSession,
    tile_id: TileId,
    mode: &str,
) -> ActionOutcome<ForestModeDetails> {
    const ACTION: ActionKind = ActionKind::SetForestExploitation;
    let Some(tile) = session.tile(tile_id) else {
        return reject(ACTION, tile_id, not_found(tile_id));
    };
    if !tile.is_owned_by_player() {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(RejectionReason::TileNotOwned, "Tile must be owned by player"),
        );
    }
    if tile.tile_type != TileType::Forest {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(RejectionReason::InvalidTileState, "Tile must be a forest"),
        );
    }
    let Ok(mode) = mode.parse::<ExploitMode>() else {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(
                RejectionReason::InvalidAction,
                "Mode must be 'conserve' or 'exploit'",
            ),
        );
    };

    if let Some(tile) = session.tile_mut(tile_id) {
        tile.exploited = mode;
    }
    debug!(tile_id = tile_id.get(), %mode, "Forest mode set");
    Ok(ActionResult::succeeded(
        format!("Forest exploitation set to {mode}"),
        ForestModeDetails { tile_id, mode },
    ))
}

// ---------------------------------------------------------------------------
// Crops
// ---------------------------------------------------------------------------

/// Water a planted field for the current turn.
pub fn irrigate(
    session: &mut GameSession,
    config: &FarmConfig,
    tile_id: TileId,
) -> ActionOutcome<IrrigateDetails> {
    const ACTION: ActionKind = ActionKind::Irrigate;
    let step = session.state.current_step;
    let Some(tile) = session.tile(tile_id) else {
        return reject(ACTION, tile_id, not_found(tile_id));
    };
    let Some(drops) = session.player.drops.checked_sub(config.costs.irrigate_drops) else {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(RejectionReason::InsufficientResources, "Not enough water drops"),
        );
    };
    if !tile.is_owned_by_player() {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(RejectionReason::TileNotOwned, "Tile not owned by player"),
        );
    }
    if !tile.is_planted() {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(
                RejectionReason::InvalidTileState,
                "Tile does not have a crop to irrigate",
            ),
        );
    }

    session.player.drops = drops;
    if let Some(tile) = session.tile_mut(tile_id) {
        tile.irrigated_this_step = true;
        tile.last_irrigated_step = Some(step);
    }
    debug!(tile_id = tile_id.get(), step, drops, "Tile irrigated");
    Ok(ActionResult::succeeded(
        "Tile irrigated successfully",
        IrrigateDetails {
            tile_id,
            step,
            drops_remaining: drops,
        },
    ))
}

/// Harvest a mature crop.
///
/// The player earns the base score plus a fertilizer bonus for every
/// neighbouring conserved forest, and a shovel. The tile stays a field.
pub fn harvest(
    session: &mut GameSession,
    config: &FarmConfig,
    tile_id: TileId,
) -> ActionOutcome<HarvestDetails> {
    const ACTION: ActionKind = ActionKind::Harvest;
    let reward = config.rewards.harvest;
    let Some(tile) = session.tile(tile_id) else {
        return reject(ACTION, tile_id, not_found(tile_id));
    };
    if tile.crop != Some(CropState::Harvest) {
        return reject(
            ACTION,
            tile_id,
            ActionResult::rejected(
                RejectionReason::InvalidTileState,
                "Tile is not ready for harvest",
            ),
        );
    }

    let adjacent_forests = session.tiles().count_adjacent_conserved_forests(tile);
    let fertilizer_bonus = reward
        .fertilizer_bonus
        .checked_mul(adjacent_forests)
        .ok_or(GameError::ArithmeticOverflow {
            field: "fertilizer_bonus",
        })?;
    let score_gained = checked_add(reward.base_score, fertilizer_bonus, "score")?;
    let score = checked_add(session.player.score, score_gained, "score")?;
    let shovels = checked_add(session.player.shovels, reward.shovels, "shovels")?;

    session.player.score = score;
    session.player.shovels = shovels;
    if let Some(tile) = session.tile_mut(tile_id) {
        tile.clear_crop();
        tile.tile_type = TileType::Field;
    }
    debug!(
        tile_id = tile_id.get(),
        score_gained,
        adjacent_forests,
        "Crop harvested"
    );
    Ok(ActionResult::succeeded(
        "Tile harvested successfully",
        HarvestDetails {
            tile_id,
            shovels_gained: reward.shovels,
            score_gained,
            base_score: reward.base_score,
            fertilizer_bonus,
            adjacent_forests,
        },
    ))
}
