//! End-to-end games driven through the public `farmit-core` API.
//!
//! Each test builds a small hand-made island, starts a game on it, and
//! plays actions and turns the way a client would.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use farmit_core::actions;
use farmit_core::{FarmConfig, GameSession, advance_turn, game_view, new_game};
use farmit_types::{CropState, ExploitMode, GridCoord, Owner, TileId, TileType, TurnReport};
use farmit_world::{FixedWeather, GridBounds, LandMap, WeatherHistory, WeatherReading};

/// A 4x4 all-land island in zone 2 (arid). Ids run 1..=16 row-major:
///
/// ```text
///  1  2  3  4
///  5  6  7  8
///  9 10 11 12
/// 13 14 15 16
/// ```
///
/// Tiles 2 and 10 start as forest.
fn island() -> LandMap {
    LandMap::uniform(GridBounds::new(4, 4).unwrap(), 2, 0.3, 14.0)
        .with_forests(&[GridCoord::new(0, 1), GridCoord::new(2, 1)])
}

fn start() -> (GameSession, FarmConfig) {
    let config = FarmConfig::default();
    let session = new_game(&mut island(), &config).unwrap();
    (session, config)
}

fn wet() -> FixedWeather {
    FixedWeather(WeatherReading::new(0.3, 14.0))
}

fn dry() -> FixedWeather {
    FixedWeather(WeatherReading::new(0.05, 22.0))
}

fn next(session: &mut GameSession, weather: &mut FixedWeather, config: &FarmConfig) -> TurnReport {
    advance_turn(Some(session), weather, config).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn buy_then_plant() {
    let (mut session, config) = start();
    assert_eq!(session.state.max_steps, 10);
    assert_eq!(session.player.shovels, 3);
    assert_eq!(session.player.drops, 3);
    assert_eq!(session.player.score, 0);

    let bought = actions::buy(&mut session, &config, TileId(5)).unwrap();
    assert!(bought.success);
    assert_eq!(session.player.shovels, 2);
    assert_eq!(session.tile(TileId(5)).unwrap().owner, Some(Owner::Player));

    let planted = actions::plant(&mut session, TileId(5), "millet").unwrap();
    assert!(planted.success);
    let tile = session.tile(TileId(5)).unwrap();
    assert_eq!(tile.tile_type, TileType::Field);
    assert_eq!(tile.crop, Some(CropState::Seed));
}

#[test]
fn arid_crop_dies_without_water() {
    let (mut session, config) = start();
    assert!(actions::buy(&mut session, &config, TileId(5)).unwrap().success);
    assert!(actions::plant(&mut session, TileId(5), "millet").unwrap().success);

    let report = next(&mut session, &mut dry(), &config);
    assert_eq!(report.summary().map(|s| s.crops_died), Some(1));
    let tile = session.tile(TileId(5)).unwrap();
    assert!((tile.humidity - 0.05).abs() < f64::EPSILON);
    assert_eq!(tile.zone_id, 2);
    assert_eq!(tile.tile_type, TileType::Empty);
    assert!(tile.crop.is_none());
}

#[test]
fn harvest_next_to_two_conserved_forests() {
    let (mut session, config) = start();
    // Tile 6 touches forests 2 and 10.
    assert!(actions::buy(&mut session, &config, TileId(6)).unwrap().success);
    assert!(actions::plant(&mut session, TileId(6), "beans").unwrap().success);
    let _ = next(&mut session, &mut wet(), &config);
    let report = next(&mut session, &mut wet(), &config);
    assert_eq!(report.summary().map(|s| s.harvest_ready), Some(1));

    let score_before = session.player.score;
    let shovels_before = session.player.shovels;
    let result = actions::harvest(&mut session, &config, TileId(6)).unwrap();
    let details = result.details.unwrap();
    assert_eq!(details.score_gained, 20);
    assert_eq!(details.shovels_gained, 1);
    assert_eq!(session.player.score, score_before + 20);
    assert_eq!(session.player.shovels, shovels_before + 1);
    assert_eq!(session.tile(TileId(6)).unwrap().tile_type, TileType::Field);
}

#[test]
fn last_turn_ends_the_game() {
    let (mut session, config) = start();
    for _ in 0..9 {
        let report = next(&mut session, &mut wet(), &config);
        assert!(report.summary().is_some());
    }
    assert_eq!(session.state.current_step, 9);
    let score = session.player.score;
    assert_eq!(score, 90);

    let report = next(&mut session, &mut wet(), &config);
    assert_eq!(
        report,
        TurnReport::GameOver {
            step: 10,
            final_score: score
        }
    );
    assert!(session.state.is_game_over);

    // Further calls change nothing.
    let again = next(&mut session, &mut wet(), &config);
    assert_eq!(again, report);
    assert_eq!(session.state.current_step, 10);
}

#[test]
fn water_reserve_protects_neighbours() {
    let (mut session, config) = start();
    assert!(actions::buy(&mut session, &config, TileId(7)).unwrap().success);
    assert!(actions::buy(&mut session, &config, TileId(8)).unwrap().success);
    let built = actions::build_water_reserve(&mut session, &config, TileId(7)).unwrap();
    assert!(built.success);
    assert_eq!(session.player.drops, 1);
    assert!(actions::plant(&mut session, TileId(8), "maize").unwrap().success);

    let report = next(&mut session, &mut dry(), &config);
    let summary = report.summary().cloned().unwrap();
    assert_eq!(summary.auto_irrigated, 1);
    assert_eq!(summary.crops_died, 0);
    let tile = session.tile(TileId(8)).unwrap();
    assert!(tile.irrigated_this_step);
    assert_eq!(tile.crop, Some(CropState::Growing));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn forests_never_carry_crops() {
    let (mut session, config) = start();
    assert!(actions::buy(&mut session, &config, TileId(2)).unwrap().success);
    assert!(!actions::plant(&mut session, TileId(2), "wheat").unwrap().success);
    for _ in 0..5 {
        let _ = next(&mut session, &mut wet(), &config);
        for tile in session.tiles().iter() {
            if tile.tile_type != TileType::Field {
                assert!(tile.crop.is_none(), "tile {} has a crop", tile.id);
            }
        }
    }
}

#[test]
fn exploiting_a_forest_removes_its_bonus() {
    let (mut session, config) = start();
    assert!(actions::buy(&mut session, &config, TileId(2)).unwrap().success);
    let mode = actions::set_forest_exploitation(&mut session, TileId(2), "exploit").unwrap();
    assert!(mode.success);
    assert_eq!(session.tile(TileId(2)).unwrap().exploited, ExploitMode::Exploit);

    assert!(actions::buy(&mut session, &config, TileId(6)).unwrap().success);
    assert!(actions::plant(&mut session, TileId(6), "beans").unwrap().success);
    let _ = next(&mut session, &mut wet(), &config);
    let _ = next(&mut session, &mut wet(), &config);
    let details = actions::harvest(&mut session, &config, TileId(6))
        .unwrap()
        .details
        .unwrap();
    // Only forest 10 still counts.
    assert_eq!(details.adjacent_forests, 1);
    assert_eq!(details.score_gained, 15);
}

#[test]
fn step_increases_by_exactly_one() {
    let (mut session, config) = start();
    let mut previous = session.state.current_step;
    while !session.state.is_game_over {
        let _ = next(&mut session, &mut wet(), &config);
        assert_eq!(session.state.current_step, previous + 1);
        assert_eq!(
            session.state.is_game_over,
            session.state.current_step >= session.state.max_steps
        );
        previous = session.state.current_step;
    }
}

#[test]
fn weather_history_drives_the_island() {
    let config = FarmConfig::default();
    let mut session = new_game(&mut island(), &config).unwrap();
    let day = |d| chrono::NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    let mut history = WeatherHistory::new(vec![
        (day(1), WeatherReading::new(0.30, 4.0)),
        (day(2), WeatherReading::new(0.25, 5.0)),
        (day(3), WeatherReading::new(0.20, 6.0)),
    ]);
    for expected in [0.25, 0.20, 0.20] {
        let _ = advance_turn(Some(&mut session), &mut history, &config).unwrap();
        let tile = session.tile(TileId(1)).unwrap();
        assert!((tile.humidity - expected).abs() < f64::EPSILON);
    }
}

#[test]
fn parcel_variant_plays_fifty_stages() {
    let config = FarmConfig::parcel_variant();
    let mut session = new_game(&mut island(), &config).unwrap();
    assert_eq!(session.player.shovels, 10);
    assert_eq!(session.player.drops, 10);

    // An owned forest pays every turn; potato and wheat have growth windows.
    for id in [2, 6, 7] {
        assert!(actions::buy(&mut session, &config, TileId(id)).unwrap().success);
    }
    assert!(actions::plant(&mut session, TileId(6), "potato").unwrap().success);
    assert!(actions::plant(&mut session, TileId(7), "wheat").unwrap().success);

    // 27 degrees is above the potato seed window and inside the wheat one.
    let mut warm = FixedWeather(WeatherReading::new(0.3, 27.0));
    let report = next(&mut session, &mut warm, &config);
    assert_eq!(report.summary().unwrap().crops_died, 1);
    assert!(session.tile(TileId(6)).unwrap().crop.is_none());
    assert_eq!(session.tile(TileId(7)).unwrap().crop, Some(CropState::Seed));
    assert_eq!(session.player.score, 12);

    let mut turns = 1;
    while !session.state.is_game_over {
        let _ = next(&mut session, &mut wet(), &config);
        turns += 1;
    }
    assert_eq!(turns, 50);
    // 49 paid turns of 10 points plus 2 for the forest.
    assert_eq!(session.player.score, 49 * 12);
    assert_eq!(session.tile(TileId(7)).unwrap().crop, Some(CropState::Harvest));
}

#[test]
fn view_reflects_ownership() {
    let (mut session, config) = start();
    assert!(actions::buy(&mut session, &config, TileId(3)).unwrap().success);
    assert!(actions::buy(&mut session, &config, TileId(1)).unwrap().success);
    let view = game_view(&session, &config.hazards);
    assert_eq!(view.player.tiles_owned, vec![TileId(1), TileId(3)]);
    assert_eq!(view.tiles.len(), 16);
    assert_eq!(view.step, 0);
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["tiles"][1]["tile_type"], "forest");
}
