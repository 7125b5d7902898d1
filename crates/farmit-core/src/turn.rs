//! Turn orchestrator: the per-turn pipeline that drives the game.
//!
//! Each call to [`advance_turn`] runs these stages in order:
//!
//! 1. **Guards** -- fail softly when no game exists; return the terminal
//!    report unchanged when the game is already over.
//! 2. **Clock** -- increment the step. Reaching `max_steps` ends the game
//!    immediately and skips every mechanic below.
//! 3. **Weather** -- read the island-wide reading for the new step and
//!    write it to every tile. A missing reading is reported in the summary
//!    and the tiles keep their previous values.
//! 4. **Irrigation reset** -- clear `irrigated_this_step` everywhere.
//! 5. **Auto-irrigation** -- water every planted tile next to a reserve.
//! 6. **Crop lifecycle** -- kill dry unirrigated crops and crops outside
//!    their growth window, then advance the survivors.
//! 7. **Income** -- credit the per-turn shovels, drops and score, plus the
//!    bonus for each owned conserved forest.
//!
//! The caller persists the session afterwards as one unit.

use farmit_types::{CropState, Tile, TurnReport, TurnSummary, WeatherUpdate, Zone};
use farmit_world::WeatherSource;
use tracing::{debug, info, warn};

use crate::config::FarmConfig;
use crate::error::{GameError, checked_add};
use crate::lifecycle;
use crate::session::GameSession;

/// Message returned when no game has been started.
pub const NOT_INITIALIZED_MESSAGE: &str = "Game not initialized. Start a new game first.";

/// Counts from the crop lifecycle stage.
struct LifecycleCounts {
    died: u32,
    advanced: u32,
}

/// Play one turn.
///
/// `session` is `None` when no game exists; that is reported as
/// [`TurnReport::NotInitialized`] rather than as an error.
pub fn advance_turn(
    session: Option<&mut GameSession>,
    weather: &mut dyn WeatherSource,
    config: &FarmConfig,
) -> Result<TurnReport, GameError> {
    // --- Guards ---
    let Some(session) = session else {
        return Ok(TurnReport::NotInitialized {
            message: NOT_INITIALIZED_MESSAGE.to_owned(),
        });
    };
    if session.state.is_game_over {
        return Ok(game_over(session));
    }

    // --- Clock ---
    let step = checked_add(session.state.current_step, 1, "current_step")?;
    session.state.current_step = step;
    if step >= session.state.max_steps {
        session.state.is_game_over = true;
        info!(
            game_id = %session.state.game_id,
            step,
            final_score = session.player.score,
            "Game over"
        );
        return Ok(game_over(session));
    }

    // --- Weather ---
    let (weather_update, hazard) = match weather.reading(step) {
        Ok(reading) => {
            let mut updated: u32 = 0;
            for tile in session.tiles_mut().iter_mut() {
                tile.humidity = reading.humidity;
                tile.temperature = reading.temperature;
                updated = updated.saturating_add(1);
            }
            let hazard = config.hazards.classify(reading.temperature, reading.humidity);
            (
                WeatherUpdate::applied(updated, reading.humidity, reading.temperature),
                hazard,
            )
        }
        Err(e) => {
            warn!(step, error = %e, "Weather unavailable, keeping previous tile readings");
            (WeatherUpdate::failed(e.to_string()), None)
        }
    };

    // --- Irrigation reset ---
    for tile in session.tiles_mut().iter_mut() {
        tile.irrigated_this_step = false;
    }

    // --- Auto-irrigation ---
    let auto_irrigated = auto_irrigate(session, step);

    // --- Crop lifecycle ---
    let counts = run_lifecycle(session, config);

    // --- Income ---
    let income = config.rewards.per_turn;
    let owned_forests = count_tiles(session, "owned_forests", |t| {
        t.is_conserved_forest() && t.is_owned_by_player()
    })?;
    let forest_score = owned_forests
        .checked_mul(income.owned_forest_score)
        .ok_or(GameError::ArithmeticOverflow { field: "score" })?;
    let player = &mut session.player;
    player.shovels = checked_add(player.shovels, income.shovels, "shovels")?;
    player.drops = checked_add(player.drops, income.drops, "drops")?;
    player.score = checked_add(player.score, income.score, "score")?;
    player.score = checked_add(player.score, forest_score, "score")?;

    let harvest_ready = count_tiles(session, "harvest_ready", |t| {
        t.crop == Some(CropState::Harvest)
    })?;

    info!(
        step,
        auto_irrigated,
        crops_died = counts.died,
        crops_advanced = counts.advanced,
        harvest_ready,
        forest_score,
        score = session.player.score,
        ?hazard,
        "Turn advanced"
    );

    Ok(TurnReport::Advanced(TurnSummary {
        step,
        auto_irrigated,
        crops_died: counts.died,
        crops_advanced: counts.advanced,
        harvest_ready,
        weather: weather_update,
        player: session.player,
        is_game_over: session.state.is_game_over,
        hazard,
    }))
}

const fn game_over(session: &GameSession) -> TurnReport {
    TurnReport::GameOver {
        step: session.state.current_step,
        final_score: session.player.score,
    }
}

/// Water every planted tile adjacent to a water reserve. Returns how many
/// tiles were watered.
fn auto_irrigate(session: &mut GameSession, step: u32) -> u32 {
    let eligible = session.tiles().tiles_adjacent_to_water_reserves();
    let mut irrigated: u32 = 0;
    for id in eligible {
        let Some(tile) = session.tile_mut(id) else {
            continue;
        };
        if !tile.is_planted() {
            continue;
        }
        tile.irrigated_this_step = true;
        tile.last_irrigated_step = Some(step);
        irrigated = irrigated.saturating_add(1);
    }
    debug!(step, irrigated, "Auto-irrigation applied");
    irrigated
}

/// Death pass followed by advancement of the survivors.
///
/// `advanced` counts every surviving crop that went through the growth
/// step, including ones already waiting at harvest.
fn run_lifecycle(session: &mut GameSession, config: &FarmConfig) -> LifecycleCounts {
    let interval = config.game.stage_advance_interval;
    let mut counts = LifecycleCounts {
        died: 0,
        advanced: 0,
    };
    for tile in session.tiles_mut().iter_mut() {
        if tile.crop.is_none() {
            continue;
        }
        if lifecycle::should_die(tile, &config.zones, &config.phenology) {
            debug!(
                tile_id = tile.id.get(),
                humidity = tile.humidity,
                temperature = tile.temperature,
                crop = tile.crop_type.as_deref().unwrap_or("unknown"),
                zone = Zone::from_id(tile.zone_id).map_or("unknown", Zone::as_str),
                "Crop died"
            );
            lifecycle::kill_crop(tile);
            counts.died = counts.died.saturating_add(1);
            continue;
        }
        lifecycle::advance_crop(tile, interval);
        counts.advanced = counts.advanced.saturating_add(1);
    }
    counts
}

/// Number of tiles matching `pred`, reporting overflow against `field`.
fn count_tiles(
    session: &GameSession,
    field: &'static str,
    pred: impl Fn(&Tile) -> bool,
) -> Result<u32, GameError> {
    let n = session.tiles().iter().filter(|t| pred(t)).count();
    u32::try_from(n).map_err(|_| GameError::ArithmeticOverflow { field })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use farmit_types::{Owner, TileId, TileType};
    use farmit_world::{FixedWeather, GridBounds, LandMap, WeatherHistory, WeatherReading};

    use super::*;
    use crate::init::new_game;

    fn start(config: &FarmConfig) -> GameSession {
        let mut map = LandMap::uniform(GridBounds::new(3, 3).unwrap(), 1, 0.3, 12.0);
        new_game(&mut map, config).unwrap()
    }

    fn wet() -> FixedWeather {
        FixedWeather(WeatherReading::new(0.3, 14.0))
    }

    fn plant(session: &mut GameSession, id: u32) {
        let tile = session.tile_mut(TileId(id)).unwrap();
        tile.owner = Some(Owner::Player);
        tile.tile_type = TileType::Field;
        tile.crop = Some(CropState::Seed);
    }

    #[test]
    fn missing_game_is_reported() {
        let report = advance_turn(None, &mut wet(), &FarmConfig::default()).unwrap();
        assert!(matches!(report, TurnReport::NotInitialized { .. }));
    }

    #[test]
    fn step_increments_and_income_is_paid() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        let report = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        let summary = report.summary().cloned().unwrap();
        assert_eq!(summary.step, 1);
        assert_eq!(session.state.current_step, 1);
        assert_eq!(summary.player.shovels, 4);
        assert_eq!(summary.player.drops, 4);
        assert_eq!(summary.player.score, 10);
        assert_eq!(summary.weather.tiles_updated, 9);
        assert!(!summary.is_game_over);
    }

    #[test]
    fn weather_is_broadcast_to_every_tile() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        let mut weather = FixedWeather(WeatherReading::new(0.22, 31.0));
        let _ = advance_turn(Some(&mut session), &mut weather, &config).unwrap();
        assert!(session
            .tiles()
            .iter()
            .all(|t| (t.humidity - 0.22).abs() < f64::EPSILON && (t.temperature - 31.0).abs() < f64::EPSILON));
    }

    #[test]
    fn weather_failure_keeps_readings_and_continues() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        let report = advance_turn(Some(&mut session), &mut WeatherHistory::empty(), &config).unwrap();
        let summary = report.summary().cloned().unwrap();
        assert_eq!(summary.weather.tiles_updated, 0);
        assert!(summary.weather.error.is_some());
        assert_eq!(summary.step, 1);
        assert_eq!(summary.player.score, 10);
        assert!(session.tiles().iter().all(|t| (t.humidity - 0.3).abs() < f64::EPSILON));
    }

    #[test]
    fn crops_grow_each_turn() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        plant(&mut session, 5);
        let first = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        assert_eq!(first.summary().map(|s| s.crops_advanced), Some(1));
        assert_eq!(session.tile(TileId(5)).unwrap().crop, Some(CropState::Growing));

        let second = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        assert_eq!(second.summary().map(|s| s.harvest_ready), Some(1));

        // Waiting at harvest still counts as advanced.
        let third = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        assert_eq!(third.summary().map(|s| s.crops_advanced), Some(1));
        assert_eq!(session.tile(TileId(5)).unwrap().crop, Some(CropState::Harvest));
    }

    #[test]
    fn dry_crop_dies_and_is_not_advanced() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        plant(&mut session, 5);
        let mut dry = FixedWeather(WeatherReading::new(0.05, 20.0));
        let report = advance_turn(Some(&mut session), &mut dry, &config).unwrap();
        let summary = report.summary().cloned().unwrap();
        assert_eq!(summary.crops_died, 1);
        assert_eq!(summary.crops_advanced, 0);
        let tile = session.tile(TileId(5)).unwrap();
        assert_eq!(tile.tile_type, TileType::Empty);
        assert!(tile.crop.is_none());
    }

    #[test]
    fn manual_irrigation_is_cleared_before_death_check() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        plant(&mut session, 5);
        session.tile_mut(TileId(5)).unwrap().irrigated_this_step = true;
        let mut dry = FixedWeather(WeatherReading::new(0.05, 20.0));
        let report = advance_turn(Some(&mut session), &mut dry, &config).unwrap();
        assert_eq!(report.summary().map(|s| s.crops_died), Some(1));
    }

    #[test]
    fn reserve_auto_irrigates_neighbours() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        plant(&mut session, 1);
        plant(&mut session, 9);
        session.tile_mut(TileId(2)).unwrap().has_water_reserve = true;
        let mut dry = FixedWeather(WeatherReading::new(0.05, 20.0));
        let report = advance_turn(Some(&mut session), &mut dry, &config).unwrap();
        let summary = report.summary().cloned().unwrap();
        assert_eq!(summary.auto_irrigated, 1);
        assert_eq!(summary.crops_died, 1);

        let saved = session.tile(TileId(1)).unwrap();
        assert!(saved.irrigated_this_step);
        assert_eq!(saved.last_irrigated_step, Some(1));
        assert_eq!(saved.crop, Some(CropState::Growing));
        // Only auto-irrigated tiles keep the flag after the turn.
        assert!(session
            .tiles()
            .iter()
            .filter(|t| t.id != TileId(1))
            .all(|t| !t.irrigated_this_step));
    }

    #[test]
    fn reaching_max_steps_skips_mechanics() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        plant(&mut session, 5);
        session.state.current_step = 9;
        session.player.score = 70;
        let mut dry = FixedWeather(WeatherReading::new(0.05, 20.0));
        let report = advance_turn(Some(&mut session), &mut dry, &config).unwrap();
        assert_eq!(
            report,
            TurnReport::GameOver {
                step: 10,
                final_score: 70
            }
        );
        assert!(session.state.is_game_over);
        // No weather, no death, no income.
        assert_eq!(session.tile(TileId(5)).unwrap().crop, Some(CropState::Seed));
        assert_eq!(session.player.shovels, 3);
    }

    #[test]
    fn finished_game_does_not_advance() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        session.state.current_step = 10;
        session.state.is_game_over = true;
        let report = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        assert!(matches!(report, TurnReport::GameOver { step: 10, .. }));
        assert_eq!(session.state.current_step, 10);
        assert!(session.state.is_game_over);
    }

    #[test]
    fn hazard_reported_from_reading() {
        let config = FarmConfig::default();
        let mut session = start(&config);
        let mut hot = FixedWeather(WeatherReading::new(0.05, 38.0));
        let report = advance_turn(Some(&mut session), &mut hot, &config).unwrap();
        assert_eq!(
            report.summary().and_then(|s| s.hazard),
            Some(farmit_types::HazardEvent::Fire)
        );
    }

    #[test]
    fn owned_conserved_forests_pay_each_turn() {
        let mut config = FarmConfig::default();
        config.rewards.per_turn.owned_forest_score = 2;
        let mut map = LandMap::uniform(GridBounds::new(3, 3).unwrap(), 1, 0.3, 12.0)
            .with_forests(&[farmit_types::GridCoord::new(0, 0), farmit_types::GridCoord::new(2, 2)]);
        let mut session = new_game(&mut map, &config).unwrap();

        // Unowned forests pay nothing.
        let _ = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        assert_eq!(session.player.score, 10);

        session.tile_mut(TileId(1)).unwrap().owner = Some(Owner::Player);
        session.tile_mut(TileId(9)).unwrap().owner = Some(Owner::Player);
        let _ = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        assert_eq!(session.player.score, 24);

        session.tile_mut(TileId(9)).unwrap().exploited = farmit_types::ExploitMode::Exploit;
        let _ = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        assert_eq!(session.player.score, 36);
    }

    #[test]
    fn forest_score_overflow_is_an_error() {
        let mut config = FarmConfig::default();
        config.rewards.per_turn.owned_forest_score = u32::MAX;
        let mut map = LandMap::uniform(GridBounds::new(3, 3).unwrap(), 1, 0.3, 12.0)
            .with_forests(&[farmit_types::GridCoord::new(0, 0), farmit_types::GridCoord::new(0, 1)]);
        let mut session = new_game(&mut map, &config).unwrap();
        for id in [1, 2] {
            session.tile_mut(TileId(id)).unwrap().owner = Some(Owner::Player);
        }
        let result = advance_turn(Some(&mut session), &mut wet(), &config);
        assert!(matches!(
            result,
            Err(GameError::ArithmeticOverflow { field: "score" })
        ));
    }

    #[test]
    fn crop_outside_growth_window_dies() {
        let config = FarmConfig::parcel_variant();
        let mut session = start(&config);
        plant(&mut session, 5);
        plant(&mut session, 6);
        session.tile_mut(TileId(5)).unwrap().crop_type = Some("potato".to_owned());
        session.tile_mut(TileId(6)).unwrap().crop_type = Some("sorghum".to_owned());

        // 33 degrees is too hot for potato seed, fine for sorghum.
        let mut hot = FixedWeather(WeatherReading::new(0.3, 33.0));
        let report = advance_turn(Some(&mut session), &mut hot, &config).unwrap();
        assert_eq!(report.summary().unwrap().crops_died, 1);
        assert!(session.tile(TileId(5)).unwrap().crop.is_none());
        assert_eq!(session.tile(TileId(6)).unwrap().crop, Some(CropState::Seed));
    }

    #[test]
    fn stage_cadence_follows_config() {
        let config = FarmConfig {
            game: crate::config::GameConfig::parcel_variant(),
            ..FarmConfig::default()
        };
        let mut session = start(&config);
        plant(&mut session, 5);
        for _ in 0..3 {
            let _ = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        }
        assert_eq!(session.tile(TileId(5)).unwrap().crop, Some(CropState::Seed));
        let _ = advance_turn(Some(&mut session), &mut wet(), &config).unwrap();
        assert_eq!(session.tile(TileId(5)).unwrap().crop, Some(CropState::Growing));
    }
}
