//! Weather readings per game step.
//!
//! The whole island shares one reading per step. A [`WeatherSource`] maps a
//! step number to a `(soil moisture, soil temperature)` pair; the turn
//! pipeline applies that pair to every tile.
//!
//! [`WeatherHistory`] serves a recorded daily series: step `n` reads day
//! `n`, and steps past the end of the series repeat the last day. A day with
//! a missing value keeps its slot, so later steps stay on their own date,
//! and reading it fails for that step only.
//! [`FixedWeather`] returns the same reading every step.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// One island-wide reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Soil moisture (volumetric fraction).
    pub humidity: f64,
    /// Soil temperature in degrees Celsius.
    pub temperature: f64,
}

impl WeatherReading {
    /// Create a reading.
    pub const fn new(humidity: f64, temperature: f64) -> Self {
        Self {
            humidity,
            temperature,
        }
    }
}

/// Provider of per-step weather.
pub trait WeatherSource {
    /// Reading for `step`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WeatherUnavailable`] when no reading can be
    /// produced for the step.
    fn reading(&mut self, step: u32) -> Result<WeatherReading, WorldError>;
}

/// A recorded daily weather series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherHistory {
    days: Vec<(NaiveDate, Option<WeatherReading>)>,
}

impl WeatherHistory {
    /// Build a history from complete dated readings in chronological order.
    pub fn new(days: Vec<(NaiveDate, WeatherReading)>) -> Self {
        Self {
            days: days
                .into_iter()
                .map(|(date, reading)| (date, Some(reading)))
                .collect(),
        }
    }

    /// An empty history. Every lookup fails.
    pub const fn empty() -> Self {
        Self { days: Vec::new() }
    }

    /// Build a history from parallel daily columns. A day where either
    /// value is missing is kept as a gap.
    pub fn from_columns(
        dates: &[NaiveDate],
        humidity: &[Option<f64>],
        temperature: &[Option<f64>],
    ) -> Self {
        let days = dates
            .iter()
            .zip(humidity.iter().zip(temperature))
            .map(|(&date, (&moisture, &temp))| {
                let reading = moisture.zip(temp).map(|(h, t)| WeatherReading::new(h, t));
                (date, reading)
            })
            .collect();
        Self { days }
    }

    /// Number of days in the series, gaps included.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Number of gap days.
    pub fn gaps(&self) -> usize {
        self.days.iter().filter(|(_, reading)| reading.is_none()).count()
    }

    /// Whether the history has no readings.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The recorded days. `None` marks a gap.
    pub fn days(&self) -> &[(NaiveDate, Option<WeatherReading>)] {
        &self.days
    }

    /// Reading for `step`, repeating the last day once the series runs out.
    /// `None` for an empty history or a gap day.
    pub fn at(&self, step: u32) -> Option<WeatherReading> {
        let index = usize::try_from(step).unwrap_or(usize::MAX);
        self.days
            .get(index)
            .or_else(|| self.days.last())
            .and_then(|&(_, reading)| reading)
    }
}

impl WeatherSource for WeatherHistory {
    fn reading(&mut self, step: u32) -> Result<WeatherReading, WorldError> {
        self.at(step).ok_or(WorldError::WeatherUnavailable { step })
    }
}

/// The same reading on every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedWeather(pub WeatherReading);

impl WeatherSource for FixedWeather {
    fn reading(&mut self, _step: u32) -> Result<WeatherReading, WorldError> {
        Ok(self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn history() -> WeatherHistory {
        WeatherHistory::new(vec![
            (day(1), WeatherReading::new(0.30, 8.0)),
            (day(2), WeatherReading::new(0.25, 9.0)),
            (day(3), WeatherReading::new(0.05, 11.0)),
        ])
    }

    #[test]
    fn step_indexes_series() {
        let mut h = history();
        let reading = h.reading(1).unwrap();
        assert!((reading.humidity - 0.25).abs() < f64::EPSILON);
        assert!((reading.temperature - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn steps_past_end_repeat_last_day() {
        let mut h = history();
        let reading = h.reading(40).unwrap();
        assert!((reading.humidity - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_history_is_unavailable() {
        let mut h = WeatherHistory::empty();
        assert!(matches!(
            h.reading(0),
            Err(WorldError::WeatherUnavailable { step: 0 })
        ));
    }

    #[test]
    fn gap_day_keeps_later_steps_on_their_date() {
        let mut h = WeatherHistory::from_columns(
            &[day(1), day(2), day(3), day(4)],
            &[Some(0.30), None, Some(0.20), Some(0.05)],
            &[Some(8.0), Some(9.0), Some(10.0), Some(11.0)],
        );
        assert_eq!(h.len(), 4);
        assert_eq!(h.gaps(), 1);

        let third = h.reading(2).unwrap();
        assert!((third.humidity - 0.20).abs() < f64::EPSILON);
        assert!((third.temperature - 10.0).abs() < f64::EPSILON);
        let fourth = h.reading(3).unwrap();
        assert!((fourth.humidity - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn gap_day_is_unavailable() {
        let mut h = WeatherHistory::from_columns(
            &[day(1), day(2), day(3)],
            &[Some(0.30), Some(0.25), Some(0.20)],
            &[Some(8.0), None, Some(10.0)],
        );
        assert!(matches!(
            h.reading(1),
            Err(WorldError::WeatherUnavailable { step: 1 })
        ));
        assert!(h.reading(2).is_ok());
    }

    #[test]
    fn fixed_weather_never_changes() {
        let mut w = FixedWeather(WeatherReading::new(0.12, 20.0));
        assert_eq!(w.reading(0).ok(), w.reading(99).ok());
    }
}
