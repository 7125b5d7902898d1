//! Daily soil history from the Open-Meteo archive API.
//!
//! One request at startup fetches the configured date range:
//!
//! ```text
//! GET {archive_url}?latitude=..&longitude=..&start_date=..&end_date=..
//!     &daily=soil_moisture_0_to_7cm_mean,soil_temperature_28_to_100cm_mean
//! ```
//!
//! A day with a missing value stays in the series as a gap, and the turn
//! that lands on it reports the weather as unavailable. If the request fails the engine
//! keeps running on an empty history, and every turn then reports the
//! weather as unavailable.

use std::time::Duration;

use chrono::NaiveDate;
use farmit_core::config::WeatherConfig;
use farmit_world::WeatherHistory;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::EngineError;

/// Daily variables requested from the archive, in column order.
const DAILY_VARIABLES: &str = "soil_moisture_0_to_7cm_mean,soil_temperature_28_to_100cm_mean";

/// Archive response body. Only the daily block is read.
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<NaiveDate>,
    soil_moisture_0_to_7cm_mean: Vec<Option<f64>>,
    soil_temperature_28_to_100cm_mean: Vec<Option<f64>>,
}

impl From<ArchiveResponse> for WeatherHistory {
    fn from(response: ArchiveResponse) -> Self {
        let daily = response.daily;
        Self::from_columns(
            &daily.time,
            &daily.soil_moisture_0_to_7cm_mean,
            &daily.soil_temperature_28_to_100cm_mean,
        )
    }
}

/// HTTP client for the archive endpoint.
pub struct OpenMeteoClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a client for the configured site and date range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Weather`] if the HTTP client cannot be built.
    pub fn new(config: &WeatherConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| EngineError::Weather {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fetch the daily series.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Weather`] if the request fails, the server
    /// answers with an error status, or the body cannot be parsed.
    pub async fn fetch_history(&self) -> Result<WeatherHistory, EngineError> {
        let c = &self.config;
        let response = self
            .client
            .get(&c.archive_url)
            .query(&[
                ("latitude", c.latitude.to_string()),
                ("longitude", c.longitude.to_string()),
                ("start_date", c.start_date.to_string()),
                ("end_date", c.end_date.to_string()),
                ("daily", DAILY_VARIABLES.to_owned()),
            ])
            .send()
            .await
            .map_err(|e| EngineError::Weather {
                message: format!("archive request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(EngineError::Weather {
                message: format!("archive returned {status}: {error_body}"),
            });
        }

        let body: ArchiveResponse = response.json().await.map_err(|e| EngineError::Weather {
            message: format!("archive response parse failed: {e}"),
        })?;
        Ok(WeatherHistory::from(body))
    }
}

/// Fetch the configured history, falling back to an empty one on failure.
pub async fn load_history(config: &WeatherConfig) -> WeatherHistory {
    let fetched = match OpenMeteoClient::new(config) {
        Ok(client) => client.fetch_history().await,
        Err(e) => Err(e),
    };
    match fetched {
        Ok(history) => {
            info!(
                days = history.len(),
                gaps = history.gaps(),
                start = %config.start_date,
                end = %config.end_date,
                "Weather history loaded"
            );
            history
        }
        Err(e) => {
            warn!(error = %e, "Weather history unavailable, turns will keep current readings");
            WeatherHistory::empty()
        }
    }
}
