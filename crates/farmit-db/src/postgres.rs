//! `PostgreSQL` pool for the game store.
//!
//! [`PostgresPool::open`] hands out a pool only once the schema is usable:
//!
//! ```text
//! parse URL -> connect -> apply migrations/ -> check singleton slots
//! ```
//!
//! The slot check reads the row counts of the three tables. A stored game
//! is exactly one `game_state` row, one `player` row and at least one tile;
//! no game is zero rows everywhere. Anything in between was left by a
//! writer outside the store and is reported as [`DbError::Corrupt`].

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::error::DbError;

/// Pool size when the configuration does not set one.
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// How long a caller waits for a free connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const COUNT_SLOTS: &str = r"SELECT
      (SELECT COUNT(*) FROM game_state) AS games,
      (SELECT COUNT(*) FROM player)     AS players,
      (SELECT COUNT(*) FROM tiles)      AS tiles";

/// What the singleton slots hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredGame {
    /// No game has been started.
    Absent,
    /// One game with this many tiles.
    Present {
        /// Stored tile rows.
        tiles: u64,
    },
}

impl StoredGame {
    /// Classify the row counts of `game_state`, `player` and `tiles`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Corrupt`] for any combination a complete
    /// `start` cannot leave behind.
    pub fn from_counts(games: i64, players: i64, tiles: i64) -> Result<Self, DbError> {
        match (games, players) {
            (0, 0) if tiles == 0 => Ok(Self::Absent),
            (1, 1) if tiles > 0 => u64::try_from(tiles)
                .map(|tiles| Self::Present { tiles })
                .map_err(|_| DbError::Corrupt(format!("tile count {tiles}"))),
            _ => Err(DbError::Corrupt(format!(
                "inconsistent game slots: game_state={games} player={players} tiles={tiles}"
            ))),
        }
    }
}

/// Migrated, checked connection pool.
#[derive(Debug, Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// Connect to `url`, migrate, and check the singleton slots.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed,
    /// [`DbError::Postgres`] if connecting fails, [`DbError::Migration`] if
    /// a migration fails, and [`DbError::Corrupt`] if the slots disagree.
    pub async fn open(url: &str, max_connections: Option<u32>) -> Result<Self, DbError> {
        let options: PgConnectOptions = url
            .parse()
            .map_err(|e: sqlx::Error| DbError::Config(format!("Invalid database URL: {e}")))?;
        let size = max_connections.unwrap_or(DEFAULT_POOL_SIZE);

        let pool = PgPoolOptions::new()
            .max_connections(size)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let this = Self { pool };
        let stored = this.stored_game().await?;
        tracing::info!(max_connections = size, ?stored, "PostgreSQL store ready");
        Ok(this)
    }

    /// Read the singleton slots.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails and
    /// [`DbError::Corrupt`] if the slots disagree.
    pub async fn stored_game(&self) -> Result<StoredGame, DbError> {
        let (games, players, tiles): (i64, i64, i64) =
            sqlx::query_as(COUNT_SLOTS).fetch_one(&self.pool).await?;
        StoredGame::from_counts(games, players, tiles)
    }

    /// The underlying [`PgPool`].
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}
