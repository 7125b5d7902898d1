//! Grid geometry, island maps, and weather data for the Farm It game.
//!
//! This crate models the physical island: the grid and its 8-connected
//! adjacency, the tile collection with its coordinate index, the land maps
//! games are built from, and the per-step weather readings applied to it.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid and data-source operations.
//! - [`grid`] -- [`GridBounds`] and neighbour computation clipped to the grid.
//! - [`tile_grid`] -- [`TileGrid`]: tiles by id and coordinate, with the
//!   adjacency queries the game rules use.
//! - [`island`] -- [`LandMap`], the [`MapSource`] trait, and the seeded
//!   bean-shaped [`IslandGenerator`].
//! - [`weather`] -- The [`WeatherSource`] trait, recorded [`WeatherHistory`]
//!   and [`FixedWeather`].
//! - [`hazard`] -- Drought/fire classification from soil readings.

pub mod error;
pub mod grid;
pub mod hazard;
pub mod island;
pub mod tile_grid;
pub mod weather;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use grid::{GridBounds, NEIGHBOR_OFFSETS};
pub use hazard::{HazardRule, HazardThresholds};
pub use island::{IslandGenerator, IslandParams, LandCell, LandMap, MAP_LAYERS, MapSource};
pub use tile_grid::TileGrid;
pub use weather::{FixedWeather, WeatherHistory, WeatherReading, WeatherSource};
