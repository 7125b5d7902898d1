//! Outcome types for turn advancement.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::HazardEvent;
use crate::structs::Player;

/// Result of applying the weather reading for a step to every tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WeatherUpdate {
    /// Number of tiles whose readings were overwritten.
    pub tiles_updated: u32,
    /// Soil moisture applied, if a reading was available.
    pub humidity: Option<f64>,
    /// Soil temperature applied, if a reading was available.
    pub temperature: Option<f64>,
    /// Why no reading was applied. Tile readings are left untouched.
    pub error: Option<String>,
}

impl WeatherUpdate {
    /// An update that applied `humidity` and `temperature` to `tiles_updated` tiles.
    pub const fn applied(tiles_updated: u32, humidity: f64, temperature: f64) -> Self {
        Self {
            tiles_updated,
            humidity: Some(humidity),
            temperature: Some(temperature),
            error: None,
        }
    }

    /// An update that could not be applied.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            tiles_updated: 0,
            humidity: None,
            temperature: None,
            error: Some(error.into()),
        }
    }
}

/// Everything that happened during one turn advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TurnSummary {
    /// The step just reached.
    pub step: u32,
    /// Planted fields watered by an adjacent reserve.
    pub auto_irrigated: u32,
    /// Crops destroyed by dry soil.
    pub crops_died: u32,
    /// Surviving crops passed through the growth step, including ones
    /// already at harvest.
    pub crops_advanced: u32,
    /// Crops at the harvest stage after advancement.
    pub harvest_ready: u32,
    /// Weather refresh outcome.
    pub weather: WeatherUpdate,
    /// Player resources after the per-turn rewards.
    pub player: Player,
    /// Whether this advance ended the game.
    pub is_game_over: bool,
    /// Hazard indicated by the applied weather reading, if any.
    pub hazard: Option<HazardEvent>,
}

/// Outcome of a turn-advance request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TurnReport {
    /// The turn was played.
    Advanced(TurnSummary),
    /// The game had already ended; nothing changed.
    GameOver {
        /// Step at which the game ended.
        step: u32,
        /// Final score.
        final_score: u32,
    },
    /// No game has been started.
    NotInitialized {
        /// Explanation for the caller.
        message: String,
    },
}

impl TurnReport {
    /// The summary, if the turn was played.
    pub const fn summary(&self) -> Option<&TurnSummary> {
        match self {
            Self::Advanced(summary) => Some(summary),
            Self::GameOver { .. } | Self::NotInitialized { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_weather_update_touches_nothing() {
        let update = WeatherUpdate::failed("archive unavailable");
        assert_eq!(update.tiles_updated, 0);
        assert!(update.humidity.is_none());
        assert_eq!(update.error.as_deref(), Some("archive unavailable"));
    }

    #[test]
    fn game_over_report_is_tagged() {
        let report = TurnReport::GameOver {
            step: 10,
            final_score: 140,
        };
        assert!(report.summary().is_none());
        let json = serde_json::to_value(&report).unwrap_or(serde_json::Value::Null);
        assert_eq!(json.get("status"), Some(&serde_json::json!("game_over")));
        assert_eq!(json.get("final_score"), Some(&serde_json::json!(140)));
    }
}
