//! Engine binary for Farm It.
//!
//! Wires configuration, logging, the weather archive, and a store together
//! and serves game commands from stdin, one JSON reply per line on stdout.
//! Logs go to stderr so they never mix with replies.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `farmit-config.yaml` (or `FARMIT_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Fetch the weather history (empty on failure)
//! 4. Open the store: `PostgreSQL` when a URL is configured, else memory
//! 5. Build the island generator
//! 6. Serve commands until `quit` or end of input

mod console;
mod error;
mod open_meteo;

use std::path::PathBuf;

use farmit_core::FarmConfig;
use farmit_core::config::LoggingConfig;
use farmit_db::GameStore;
use farmit_world::IslandGenerator;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console::Console;
use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "farmit-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step fails or stdin/stdout
/// become unusable.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        max_steps = config.game.max_steps,
        rows = config.map.rows,
        cols = config.map.cols,
        "farmit-engine starting"
    );

    // 3. Weather history.
    let weather = open_meteo::load_history(&config.weather).await;

    // 4. Store.
    let store = GameStore::open(
        config.database.url.as_deref(),
        config.database.max_connections,
    )
    .await
    .map_err(EngineError::from)?;
    info!(backend = store.backend(), "Store ready");

    // 5. Island generator.
    let islands = IslandGenerator::new(
        config.map.island_params(config.zones.default_zone),
        config.map.seed,
    )
    .map_err(EngineError::from)?;

    // 6. Serve commands.
    let mut console = Console::new(store, config, weather, Box::new(islands));
    console
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    console.close().await;

    info!("farmit-engine shutdown complete");
    Ok(())
}

/// Load configuration from `FARMIT_CONFIG` or `farmit-config.yaml`.
///
/// A missing file falls back to defaults; `DATABASE_URL` still applies.
fn load_config() -> Result<FarmConfig, EngineError> {
    let path = std::env::var_os("FARMIT_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        Ok(FarmConfig::from_file(&path)?)
    } else {
        let mut config = FarmConfig::default();
        config.database.apply_env_overrides();
        Ok(config)
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(logging: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
