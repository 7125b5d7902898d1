//! Hazard classification from soil readings.
//!
//! A hazard is informational: it is shown on tiles and in turn summaries but
//! no mechanic consumes it. Rules are checked in order and the first one
//! whose indicators are all met wins.

use farmit_types::HazardEvent;
use serde::{Deserialize, Serialize};

/// One classification rule. Absent indicators are not checked; a rule with
/// no indicator never matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardRule {
    /// Hazard reported when the rule matches.
    pub event: HazardEvent,
    /// Matches when the soil temperature is strictly above this value.
    #[serde(default)]
    pub temperature_above: Option<f64>,
    /// Matches when the soil moisture is strictly below this value.
    #[serde(default)]
    pub soil_moisture_below: Option<f64>,
}

impl HazardRule {
    fn matches(&self, temperature: f64, humidity: f64) -> bool {
        if self.temperature_above.is_none() && self.soil_moisture_below.is_none() {
            return false;
        }
        self.temperature_above.is_none_or(|t| temperature > t)
            && self.soil_moisture_below.is_none_or(|h| humidity < h)
    }
}

/// Ordered hazard rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HazardThresholds {
    rules: Vec<HazardRule>,
}

impl Default for HazardThresholds {
    /// Fire when hot and dry, otherwise drought when very dry.
    fn default() -> Self {
        Self {
            rules: vec![
                HazardRule {
                    event: HazardEvent::Fire,
                    temperature_above: Some(35.0),
                    soil_moisture_below: Some(0.15),
                },
                HazardRule {
                    event: HazardEvent::Drought,
                    temperature_above: None,
                    soil_moisture_below: Some(0.10),
                },
            ],
        }
    }
}

impl HazardThresholds {
    /// Build from an ordered rule list.
    pub const fn new(rules: Vec<HazardRule>) -> Self {
        Self { rules }
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[HazardRule] {
        &self.rules
    }

    /// Hazard indicated by a reading, if any.
    pub fn classify(&self, temperature: f64, humidity: f64) -> Option<HazardEvent> {
        self.rules
            .iter()
            .find(|rule| rule.matches(temperature, humidity))
            .map(|rule| rule.event)
    }
}
