//! Per-crop growth windows.
//!
//! A [`PhenologyTable`] maps a crop name to the temperature and soil
//! moisture range it tolerates in each growth stage. Crops missing from the
//! table, and stages a crop has no window for, are only subject to the zone
//! humidity threshold.
//!
//! ```yaml
//! phenology:
//!   wheat:
//!     seed:    { temp_min: 4.0, temp_max: 30.0, moisture_min: 0.15, moisture_max: 0.45 }
//!     growing: { temp_min: 5.0, temp_max: 32.0, moisture_min: 0.12, moisture_max: 0.45 }
//! ```

use std::collections::BTreeMap;

use farmit_types::CropState;
use serde::Deserialize;

/// Tolerated range for one crop stage. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GrowthWindow {
    /// Lowest tolerated soil temperature.
    pub temp_min: f64,
    /// Highest tolerated soil temperature.
    pub temp_max: f64,
    /// Lowest tolerated soil moisture.
    pub moisture_min: f64,
    /// Highest tolerated soil moisture.
    pub moisture_max: f64,
}

impl GrowthWindow {
    /// Create a window.
    pub const fn new(temp: (f64, f64), moisture: (f64, f64)) -> Self {
        Self {
            temp_min: temp.0,
            temp_max: temp.1,
            moisture_min: moisture.0,
            moisture_max: moisture.1,
        }
    }

    /// Whether `temperature` is inside the window.
    pub fn tolerates_temperature(&self, temperature: f64) -> bool {
        (self.temp_min..=self.temp_max).contains(&temperature)
    }

    /// Whether `moisture` is inside the window.
    pub fn tolerates_moisture(&self, moisture: f64) -> bool {
        (self.moisture_min..=self.moisture_max).contains(&moisture)
    }
}

/// Windows of one crop, by stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct StageWindows {
    /// Window while the crop is a seed.
    #[serde(default)]
    pub seed: Option<GrowthWindow>,
    /// Window while the crop is growing.
    #[serde(default)]
    pub growing: Option<GrowthWindow>,
    /// Window while the crop waits for harvest.
    #[serde(default)]
    pub harvest: Option<GrowthWindow>,
}

impl StageWindows {
    /// Window for `stage`, if any.
    pub const fn for_stage(&self, stage: CropState) -> Option<&GrowthWindow> {
        match stage {
            CropState::Seed => self.seed.as_ref(),
            CropState::Growing => self.growing.as_ref(),
            CropState::Harvest => self.harvest.as_ref(),
        }
    }
}

/// Growth windows keyed by lowercase crop name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PhenologyTable(BTreeMap<String, StageWindows>);

impl PhenologyTable {
    /// Build a table from `(crop, windows)` pairs. Names are lowercased.
    pub fn new(crops: impl IntoIterator<Item = (String, StageWindows)>) -> Self {
        Self(
            crops
                .into_iter()
                .map(|(name, windows)| (name.to_lowercase(), windows))
                .collect(),
        )
    }

    /// Windows for the temperate/arid crops of the parcel variant.
    pub fn parcel_defaults() -> Self {
        let wheat = StageWindows {
            seed: Some(GrowthWindow::new((4.0, 30.0), (0.15, 0.45))),
            growing: Some(GrowthWindow::new((5.0, 32.0), (0.12, 0.45))),
            harvest: Some(GrowthWindow::new((8.0, 35.0), (0.08, 0.40))),
        };
        let potato = StageWindows {
            seed: Some(GrowthWindow::new((7.0, 25.0), (0.20, 0.50))),
            growing: Some(GrowthWindow::new((10.0, 27.0), (0.20, 0.50))),
            harvest: Some(GrowthWindow::new((10.0, 28.0), (0.15, 0.45))),
        };
        let sorghum = StageWindows {
            seed: Some(GrowthWindow::new((12.0, 40.0), (0.08, 0.40))),
            growing: Some(GrowthWindow::new((15.0, 42.0), (0.06, 0.40))),
            harvest: Some(GrowthWindow::new((15.0, 42.0), (0.05, 0.35))),
        };
        Self::new([
            ("wheat".to_owned(), wheat),
            ("potato".to_owned(), potato),
            ("sorghum".to_owned(), sorghum),
        ])
    }

    /// Whether the table has no crops.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Window for `crop` at `stage`. The crop name is matched
    /// case-insensitively.
    pub fn window(&self, crop: &str, stage: CropState) -> Option<&GrowthWindow> {
        self.0.get(&crop.to_lowercase())?.for_stage(stage)
    }

    /// First problem found in the table, if any.
    pub fn problem(&self) -> Option<String> {
        for (crop, windows) in &self.0 {
            if crop.chars().any(char::is_uppercase) {
                return Some(format!("phenology crop name {crop:?} must be lowercase"));
            }
            for stage in [CropState::Seed, CropState::Growing, CropState::Harvest] {
                let Some(w) = windows.for_stage(stage) else {
                    continue;
                };
                if w.temp_min > w.temp_max || w.moisture_min > w.moisture_max {
                    return Some(format!("phenology.{crop}.{stage}: min exceeds max"));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds_are_inclusive() {
        let w = GrowthWindow::new((5.0, 30.0), (0.1, 0.4));
        assert!(w.tolerates_temperature(5.0));
        assert!(w.tolerates_temperature(30.0));
        assert!(!w.tolerates_temperature(30.5));
        assert!(w.tolerates_moisture(0.1));
        assert!(!w.tolerates_moisture(0.09));
    }

    #[test]
    fn lookup_ignores_case() {
        let table = PhenologyTable::parcel_defaults();
        assert!(table.window("Wheat", CropState::Seed).is_some());
        assert!(table.window("WHEAT", CropState::Harvest).is_some());
        assert!(table.window("millet", CropState::Seed).is_none());
    }

    #[test]
    fn missing_stage_has_no_window() {
        let table = PhenologyTable::new([(
            "rice".to_owned(),
            StageWindows {
                growing: Some(GrowthWindow::new((20.0, 35.0), (0.3, 0.9))),
                ..StageWindows::default()
            },
        )]);
        assert!(table.window("rice", CropState::Seed).is_none());
        assert!(table.window("rice", CropState::Growing).is_some());
    }

    #[test]
    fn inverted_window_is_a_problem() {
        let table = PhenologyTable::new([(
            "wheat".to_owned(),
            StageWindows {
                seed: Some(GrowthWindow::new((30.0, 5.0), (0.1, 0.4))),
                ..StageWindows::default()
            },
        )]);
        assert!(table.problem().is_some());
        assert!(PhenologyTable::parcel_defaults().problem().is_none());
    }
}
