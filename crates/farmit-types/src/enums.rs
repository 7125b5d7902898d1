//! Enumeration types for the Farm It simulation.
//!
//! Every enum serializes in `snake_case` so the wire format matches the
//! strings the frontend and the database use (`"field"`, `"seed"`,
//! `"conserve"`, ...). The [`as_str`](TileType::as_str) / [`FromStr`]
//! pairs exist for storage columns.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Error returned when a stored or user-supplied string does not name a
/// known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// The enum that was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl core::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Generates `as_str`, `Display` and `FromStr` for a fieldless enum from a
/// variant-to-string table.
macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Return the canonical lowercase name of this variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Tile classification
// ---------------------------------------------------------------------------

/// What currently occupies a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TileType {
    /// Bare land. Can be planted, which turns it into a field.
    Empty,
    /// Cultivated land. The only type that may carry a crop.
    Field,
    /// Woodland. Never carries a crop; its exploitation mode matters.
    Forest,
}

string_enum!(TileType, "tile type", {
    Empty => "empty",
    Field => "field",
    Forest => "forest",
});

/// Growth stage of the crop on a field.
///
/// The lifecycle is `Seed -> Growing -> Harvest`; `Harvest` persists until
/// the player harvests the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CropState {
    /// Freshly planted.
    Seed,
    /// Past germination.
    Growing,
    /// Mature and ready to be harvested.
    Harvest,
}

string_enum!(CropState, "crop state", {
    Seed => "seed",
    Growing => "growing",
    Harvest => "harvest",
});

impl CropState {
    /// The stage that follows this one. `Harvest` is absorbing.
    pub const fn next(self) -> Self {
        match self {
            Self::Seed => Self::Growing,
            Self::Growing | Self::Harvest => Self::Harvest,
        }
    }
}

/// Owner of a tile. Only the single player is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Owner {
    /// The player of this game.
    Player,
}

string_enum!(Owner, "owner", {
    Player => "player",
});

/// Management mode of a forest tile.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ExploitMode {
    /// Left standing. Grants a fertilizer bonus to neighbouring harvests.
    #[default]
    Conserve,
    /// Logged. No bonus.
    Exploit,
}

string_enum!(ExploitMode, "exploitation mode", {
    Conserve => "conserve",
    Exploit => "exploit",
});

/// Climate zone of a tile.
///
/// Tiles store the numeric zone id; this enum names the known ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Zone {
    /// Zone 1.
    Cold,
    /// Zone 2.
    Arid,
    /// Zone 3.
    Tropical,
    /// Zone 4.
    Temperate,
}

string_enum!(Zone, "zone", {
    Cold => "cold",
    Arid => "arid",
    Tropical => "tropical",
    Temperate => "temperate",
});

impl Zone {
    /// Map a numeric zone id to a named zone.
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::Cold),
            2 => Some(Self::Arid),
            3 => Some(Self::Tropical),
            4 => Some(Self::Temperate),
            _ => None,
        }
    }

    /// The numeric id stored on tiles.
    pub const fn id(self) -> u32 {
        match self {
            Self::Cold => 1,
            Self::Arid => 2,
            Self::Tropical => 3,
            Self::Temperate => 4,
        }
    }
}

/// Environmental hazard derived from a temperature/soil-moisture reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum HazardEvent {
    /// Soil too dry.
    Drought,
    /// Hot and dry enough for wildfire.
    Fire,
}

string_enum!(HazardEvent, "hazard event", {
    Drought => "Drought",
    Fire => "Fire",
});

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A player-initiated action on a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActionKind {
    /// Take ownership of an unowned tile.
    Buy,
    /// Plant a crop on an owned empty tile or field.
    Plant,
    /// Build a water reserve that irrigates neighbours every turn.
    BuildWaterReserve,
    /// Build a firebreak.
    BuildFirebreak,
    /// Switch a forest between conserve and exploit.
    SetForestExploitation,
    /// Water a planted field for the current turn.
    Irrigate,
    /// Collect a mature crop.
    Harvest,
}

string_enum!(ActionKind, "action", {
    Buy => "buy",
    Plant => "plant",
    BuildWaterReserve => "build_water_reserve",
    BuildFirebreak => "build_firebreak",
    SetForestExploitation => "set_forest_exploitation",
    Irrigate => "irrigate",
    Harvest => "harvest",
});

/// Why a tile action was rejected.
///
/// Rejections are ordinary results, never errors: the caller decides how to
/// surface them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// No tile with the requested id exists.
    TileNotFound,
    /// The tile is not owned by the player.
    TileNotOwned,
    /// The tile already has an owner.
    TileAlreadyOwned,
    /// The tile is in the wrong state for this action.
    InvalidTileState,
    /// The player cannot afford the action.
    InsufficientResources,
    /// An argument of the action is not acceptable.
    InvalidAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_state_progression_is_absorbing() {
        assert_eq!(CropState::Seed.next(), CropState::Growing);
        assert_eq!(CropState::Growing.next(), CropState::Harvest);
        assert_eq!(CropState::Harvest.next(), CropState::Harvest);
    }

    #[test]
    fn string_round_trip_for_storage() {
        for t in [TileType::Empty, TileType::Field, TileType::Forest] {
            assert_eq!(t.as_str().parse::<TileType>().ok(), Some(t));
        }
        assert_eq!("exploit".parse::<ExploitMode>().ok(), Some(ExploitMode::Exploit));
        assert!("logged".parse::<ExploitMode>().is_err());
    }

    #[test]
    fn serde_matches_storage_names() {
        let json = serde_json::to_string(&ActionKind::BuildWaterReserve).ok();
        assert_eq!(json.as_deref(), Some("\"build_water_reserve\""));
        let json = serde_json::to_string(&Owner::Player).ok();
        assert_eq!(json.as_deref(), Some("\"player\""));
    }

    #[test]
    fn zone_ids() {
        assert_eq!(Zone::from_id(2), Some(Zone::Arid));
        assert_eq!(Zone::from_id(9), None);
        assert_eq!(Zone::Temperate.id(), 4);
    }

    #[test]
    fn unknown_variant_message_names_the_kind() {
        let err = "swamp".parse::<TileType>().err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("unknown tile type 'swamp'")
        );
    }
}
