//! Line-oriented command console.
//!
//! Reads one command per line and writes one JSON reply per line:
//!
//! | Command | Effect |
//! |---|---|
//! | `start` | start a new game on a fresh island |
//! | `state` | full board snapshot |
//! | `buy <id>` | buy a tile |
//! | `plant <id> <crop>` | plant a crop |
//! | `irrigate <id>` | irrigate a tile |
//! | `harvest <id>` | harvest a ripe crop |
//! | `reserve <id>` | build a water reserve |
//! | `firebreak <id>` | build a firebreak |
//! | `forest <id> <conserve\|exploit>` | set forest mode |
//! | `next` | advance one turn |
//! | `quit` | stop reading |
//!
//! Failures never stop the loop; they are answered with
//! `{"success": false, "message": ...}`.

use core::str::FromStr;

use farmit_core::turn::NOT_INITIALIZED_MESSAGE;
use farmit_core::{FarmConfig, GameError, actions, advance_turn, game_view, new_game};
use farmit_db::{DbError, GameStore};
use farmit_types::TileId;
use farmit_world::{MapSource, WeatherHistory};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};
use tracing::{debug, warn};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new game.
    Start,
    /// Show the board.
    State,
    /// Buy a tile.
    Buy(TileId),
    /// Plant a crop of the given type.
    Plant(TileId, String),
    /// Irrigate a tile.
    Irrigate(TileId),
    /// Harvest a tile.
    Harvest(TileId),
    /// Build a water reserve.
    Reserve(TileId),
    /// Build a firebreak.
    Firebreak(TileId),
    /// Set the exploitation mode of a forest.
    Forest(TileId, String),
    /// Advance one turn.
    Next,
    /// Stop the console.
    Quit,
}

/// A line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line holds no command.
    #[error("empty command")]
    Empty,

    /// The first word is not a command.
    #[error("unknown command '{word}'")]
    Unknown {
        /// The rejected word.
        word: String,
    },

    /// A required argument is missing.
    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        /// The command being parsed.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// The tile id is not a non-negative integer.
    #[error("invalid tile id '{value}'")]
    InvalidTileId {
        /// The rejected text.
        value: String,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(CommandError::Empty)?;
        let command = match word.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "state" => Self::State,
            "next" => Self::Next,
            "quit" | "exit" => Self::Quit,
            "buy" => Self::Buy(tile_arg(words.next(), "buy")?),
            "irrigate" => Self::Irrigate(tile_arg(words.next(), "irrigate")?),
            "harvest" => Self::Harvest(tile_arg(words.next(), "harvest")?),
            "reserve" => Self::Reserve(tile_arg(words.next(), "reserve")?),
            "firebreak" => Self::Firebreak(tile_arg(words.next(), "firebreak")?),
            "plant" => {
                let id = tile_arg(words.next(), "plant")?;
                Self::Plant(id, text_arg(words.next(), "plant", "crop type")?)
            }
            "forest" => {
                let id = tile_arg(words.next(), "forest")?;
                Self::Forest(id, text_arg(words.next(), "forest", "mode")?)
            }
            other => {
                return Err(CommandError::Unknown {
                    word: other.to_owned(),
                });
            }
        };
        Ok(command)
    }
}

fn tile_arg(word: Option<&str>, command: &'static str) -> Result<TileId, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument {
        command,
        argument: "tile id",
    })?;
    word.parse::<u32>()
        .map(TileId)
        .map_err(|_| CommandError::InvalidTileId {
            value: word.to_owned(),
        })
}

fn text_arg(
    word: Option<&str>,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandError> {
    word.map(ToOwned::to_owned)
        .ok_or(CommandError::MissingArgument { command, argument })
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Drives games in a store from parsed commands.
pub struct Console {
    store: GameStore,
    config: FarmConfig,
    weather: WeatherHistory,
    map: Box<dyn MapSource + Send>,
}

impl Console {
    /// Create a console over `store`. New games are built from `map`.
    pub fn new(
        store: GameStore,
        config: FarmConfig,
        weather: WeatherHistory,
        map: Box<dyn MapSource + Send>,
    ) -> Self {
        Self {
            store,
            config,
            weather,
            map,
        }
    }

    /// Run one command and return its JSON reply.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for storage and infrastructure failures.
    /// Rejected actions and a missing game are replies, not errors.
    pub async fn execute(&mut self, command: Command) -> Result<Value, EngineError> {
        let config = &self.config;
        let reply = match command {
            Command::Start => {
                let session = new_game(self.map.as_mut(), config)?;
                let view = game_view(&session, &config.hazards);
                self.store.start(session).await?;
                to_json(&view)?
            }
            Command::State => match self.store.snapshot().await? {
                Some(session) => to_json(&game_view(&session, &config.hazards))?,
                None => not_initialized(),
            },
            Command::Next => {
                let weather = &mut self.weather;
                let report = self
                    .store
                    .transact(|session| advance_turn(session, weather, config))
                    .await?;
                to_json(&report)?
            }
            Command::Buy(id) => {
                action(self.store.with_game(|s| actions::buy(s, config, id)).await)?
            }
            Command::Plant(id, crop) => action(
                self.store
                    .with_game(|s| actions::plant(s, id, &crop))
                    .await,
            )?,
            Command::Irrigate(id) => action(
                self.store
                    .with_game(|s| actions::irrigate(s, config, id))
                    .await,
            )?,
            Command::Harvest(id) => action(
                self.store
                    .with_game(|s| actions::harvest(s, config, id))
                    .await,
            )?,
            Command::Reserve(id) => action(
                self.store
                    .with_game(|s| actions::build_water_reserve(s, config, id))
                    .await,
            )?,
            Command::Firebreak(id) => action(
                self.store
                    .with_game(|s| actions::build_firebreak(s, config, id))
                    .await,
            )?,
            Command::Forest(id, mode) => action(
                self.store
                    .with_game(|s| actions::set_forest_exploitation(s, id, &mode))
                    .await,
            )?,
            Command::Quit => json!({ "success": true, "message": "bye" }),
        };
        Ok(reply)
    }

    /// Serve commands from `input` until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if reading or writing fails.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<(), EngineError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!(command = line, "Command received");
            let reply = match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await.unwrap_or_else(|e| {
                    warn!(error = %e, command = line, "Command failed");
                    failure(&e.to_string())
                }),
                Err(e) => failure(&e.to_string()),
            };
            let mut text = serde_json::to_string(&reply)?;
            text.push('\n');
            output.write_all(text.as_bytes()).await?;
            output.flush().await?;
        }
        Ok(())
    }

    /// Release the store.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, EngineError> {
    Ok(serde_json::to_value(value)?)
}

/// Turn an action outcome into a reply. A missing game is a reply too.
fn action<T: Serialize>(outcome: Result<T, DbError>) -> Result<Value, EngineError> {
    match outcome {
        Ok(result) => to_json(&result),
        Err(DbError::Game(GameError::NotInitialized)) => Ok(not_initialized()),
        Err(e) => Err(e.into()),
    }
}

fn not_initialized() -> Value {
    failure(NOT_INITIALIZED_MESSAGE)
}

fn failure(message: &str) -> Value {
    json!({ "success": false, "message": message })
}
