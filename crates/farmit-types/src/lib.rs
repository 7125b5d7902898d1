//! Shared type definitions for the Farm It game engine.
//!
//! This crate is the single source of truth for all types used across the
//! Farm It workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the board frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Game and tile identifiers
//! - [`enums`] -- Enumeration types (tile types, crop stages, hazards, rejections)
//! - [`structs`] -- Core entity structs (game state, player, tile, read views)
//! - [`actions`] -- Per-action result and detail types
//! - [`turn`] -- Turn advancement reports

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;
pub mod turn;

// Re-export all public types at crate root for convenience.
pub use actions::{
    ActionResult, BuyDetails, FirebreakDetails, ForestModeDetails, HarvestDetails,
    IrrigateDetails, PlantDetails, WaterReserveDetails,
};
pub use enums::{
    ActionKind, CropState, ExploitMode, HazardEvent, Owner, RejectionReason, TileType,
    UnknownVariant, Zone,
};
pub use ids::{GameId, TileId};
pub use structs::{GameState, GameView, GridCoord, Player, PlayerView, Tile, TileView};
pub use turn::{TurnReport, TurnSummary, WeatherUpdate};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes bindings for every #[ts(export)] type reachable from
        // these calls into `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::GameId::export_all();
        let _ = crate::ids::TileId::export_all();

        // Enums
        let _ = crate::enums::TileType::export_all();
        let _ = crate::enums::CropState::export_all();
        let _ = crate::enums::Owner::export_all();
        let _ = crate::enums::ExploitMode::export_all();
        let _ = crate::enums::Zone::export_all();
        let _ = crate::enums::HazardEvent::export_all();
        let _ = crate::enums::ActionKind::export_all();
        let _ = crate::enums::RejectionReason::export_all();

        // Structs
        let _ = crate::structs::GridCoord::export_all();
        let _ = crate::structs::GameState::export_all();
        let _ = crate::structs::Player::export_all();
        let _ = crate::structs::Tile::export_all();
        let _ = crate::structs::PlayerView::export_all();
        let _ = crate::structs::TileView::export_all();
        let _ = crate::structs::GameView::export_all();

        // Actions
        let _ = crate::actions::ActionResult::<crate::actions::BuyDetails>::export_all();
        let _ = crate::actions::PlantDetails::export_all();
        let _ = crate::actions::WaterReserveDetails::export_all();
        let _ = crate::actions::FirebreakDetails::export_all();
        let _ = crate::actions::ForestModeDetails::export_all();
        let _ = crate::actions::IrrigateDetails::export_all();
        let _ = crate::actions::HarvestDetails::export_all();

        // Turns
        let _ = crate::turn::WeatherUpdate::export_all();
        let _ = crate::turn::TurnSummary::export_all();
        let _ = crate::turn::TurnReport::export_all();
    }
}
