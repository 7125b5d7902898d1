//! Game rules, tile actions, and the turn cycle for Farm It.
//!
//! This crate owns the mechanics: everything here is synchronous and works
//! on an explicit [`GameSession`] so a store can wrap each call in a single
//! transaction.
//!
//! # Modules
//!
//! - [`actions`] -- Buy, plant, build, forest mode, irrigate, and harvest.
//! - [`config`] -- Configuration loading from `farmit-config.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- [`GameError`] for failures that abort a call.
//! - [`init`] -- Building a new game from a map source.
//! - [`lifecycle`] -- Crop death check and stage advancement.
//! - [`phenology`] -- Per-crop growth windows.
//! - [`session`] -- [`GameSession`], the state of one running game.
//! - [`turn`] -- The per-turn pipeline.
//! - [`view`] -- Board snapshots for display.
//!
//! [`GameError`]: error::GameError
//! [`GameSession`]: session::GameSession

pub mod actions;
pub mod config;
pub mod error;
pub mod init;
pub mod lifecycle;
pub mod phenology;
pub mod session;
pub mod turn;
pub mod view;

pub use config::{ConfigError, FarmConfig};
pub use error::GameError;
pub use init::new_game;
pub use session::GameSession;
pub use turn::advance_turn;
pub use view::game_view;
