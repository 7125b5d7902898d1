//! Result types for tile actions.
//!
//! Every action returns an [`ActionResult`] carrying a success flag, a
//! human-readable message, and either action-specific details (on success)
//! or a [`RejectionReason`] (on failure). The detail type is fixed per
//! action, so callers know statically which fields each action reports.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ExploitMode, RejectionReason};
use crate::ids::TileId;

/// Outcome of a single tile action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionResult<D> {
    /// Whether the action was applied.
    pub success: bool,
    /// Human-readable description of what happened or why it did not.
    pub message: String,
    /// Machine-readable rejection reason, set only on failure.
    pub rejection: Option<RejectionReason>,
    /// Action-specific details, set only on success.
    pub details: Option<D>,
}

impl<D> ActionResult<D> {
    /// Build a successful result.
    pub fn succeeded(message: impl Into<String>, details: D) -> Self {
        Self {
            success: true,
            message: message.into(),
            rejection: None,
            details: Some(details),
        }
    }

    /// Build a rejected result.
    pub fn rejected(reason: RejectionReason, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            rejection: Some(reason),
            details: None,
        }
    }
}

/// Details of a successful purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BuyDetails {
    /// The purchased tile.
    pub tile_id: TileId,
    /// Shovels left after paying.
    pub shovels_remaining: u32,
}

/// Details of a successful planting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlantDetails {
    /// The planted tile.
    pub tile_id: TileId,
    /// The crop name given by the player.
    pub crop_type: String,
}

/// Details of a successful water reserve construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WaterReserveDetails {
    /// The tile that received the reserve.
    pub tile_id: TileId,
    /// Drops left after paying.
    pub drops_remaining: u32,
}

/// Details of a successful firebreak construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FirebreakDetails {
    /// The tile that received the firebreak.
    pub tile_id: TileId,
    /// Shovels left after paying.
    pub shovels_remaining: u32,
}

/// Details of a forest mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ForestModeDetails {
    /// The forest tile.
    pub tile_id: TileId,
    /// The mode now in effect.
    pub mode: ExploitMode,
}

/// Details of a manual irrigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct IrrigateDetails {
    /// The irrigated tile.
    pub tile_id: TileId,
    /// Step recorded as the last irrigation.
    pub step: u32,
    /// Drops left after paying.
    pub drops_remaining: u32,
}

/// Rewards granted by a harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HarvestDetails {
    /// The harvested tile.
    pub tile_id: TileId,
    /// Shovels added to the player.
    pub shovels_gained: u32,
    /// Total score added (`base_score + fertilizer_bonus`).
    pub score_gained: u32,
    /// Flat score part of the reward.
    pub base_score: u32,
    /// Score earned from neighbouring conserved forests.
    pub fertilizer_bonus: u32,
    /// Number of neighbouring conserved forests.
    pub adjacent_forests: u32,
}
