//! `PostgreSQL`-backed game storage.
//!
//! Every call to [`PgGameStore::transact`] runs in one transaction:
//!
//! ```text
//! BEGIN
//!   SELECT game_state ... FOR UPDATE     -- serializes concurrent calls
//!   SELECT player, tiles
//!   run the operation on the loaded GameSession
//!   UPDATE game_state, player
//!   UPSERT touched tiles (UNNEST batch)
//! COMMIT                                 -- or ROLLBACK if anything failed
//! ```
//!
//! Counters are stored as `BIGINT` and checked back into `u32` on load. A
//! tile that was never irrigated stores `last_irrigated_step = -1`.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use farmit_core::{GameError, GameSession};
use farmit_types::{
    CropState, ExploitMode, GameId, GameState, GridCoord, Owner, Player, Tile, TileId, TileType,
    UnknownVariant,
};
use farmit_world::{GridBounds, TileGrid};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DbError;
use crate::postgres::PostgresPool;

/// Stored value of `last_irrigated_step` for a tile never irrigated.
const NEVER_IRRIGATED: i64 = -1;

const SELECT_STATE: &str = r"SELECT game_id, current_step, max_steps, is_game_over, map_rows, map_cols, started_at
      FROM game_state WHERE slot = 1";

const SELECT_STATE_FOR_UPDATE: &str = r"SELECT game_id, current_step, max_steps, is_game_over, map_rows, map_cols, started_at
      FROM game_state WHERE slot = 1 FOR UPDATE";

/// Game storage in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgGameStore {
    pool: PostgresPool,
}

impl PgGameStore {
    /// Create a store on an already migrated pool.
    pub const fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub const fn pool(&self) -> &PostgresPool {
        &self.pool
    }

    /// Delete any stored game and write `session` in its place.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails; the previous
    /// game is then kept.
    pub async fn start(&self, mut session: GameSession) -> Result<(), DbError> {
        session.take_touched();
        let mut tx = self.pool.pool().begin().await?;

        for statement in [
            "DELETE FROM tiles",
            "DELETE FROM player",
            "DELETE FROM game_state",
        ] {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        let state = &session.state;
        sqlx::query(
            r"INSERT INTO game_state (slot, game_id, current_step, max_steps, is_game_over, map_rows, map_cols, started_at)
              VALUES (1, $1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(state.game_id.into_inner())
        .bind(i64::from(state.current_step))
        .bind(i64::from(state.max_steps))
        .bind(state.is_game_over)
        .bind(i64::from(state.rows))
        .bind(i64::from(state.cols))
        .bind(state.started_at)
        .execute(&mut *tx)
        .await?;

        let player = session.player;
        sqlx::query(
            r"INSERT INTO player (slot, shovels, drops, score)
              VALUES (1, $1, $2, $3)",
        )
        .bind(i64::from(player.shovels))
        .bind(i64::from(player.drops))
        .bind(i64::from(player.score))
        .execute(&mut *tx)
        .await?;

        upsert_tiles(&mut *tx, session.tiles().iter()).await?;
        tx.commit().await?;

        tracing::debug!(
            game_id = %session.state.game_id,
            tiles = session.tiles().len(),
            "Stored new game"
        );
        Ok(())
    }

    /// Run `op` against the stored game inside one transaction.
    ///
    /// `op` receives `None` when no game is stored. On success the game
    /// state, the player and every tile `op` touched are written back and
    /// the transaction commits.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Game`] if `op` fails, or [`DbError::Postgres`] /
    /// [`DbError::Corrupt`] for storage failures. In every error case the
    /// transaction is rolled back and nothing is written.
    pub async fn transact<T, F>(&self, op: F) -> Result<T, DbError>
    where
        F: FnOnce(Option<&mut GameSession>) -> Result<T, GameError>,
    {
        let mut tx = self.pool.pool().begin().await?;
        let mut session = load(&mut *tx, true).await?;

        // Dropping `tx` on the error path rolls it back.
        let out = op(session.as_mut())?;

        if let Some(session) = session.as_mut() {
            let touched = session.take_touched();
            update_singletons(&mut *tx, session).await?;
            upsert_tiles(
                &mut *tx,
                session.tiles().iter().filter(|t| touched.contains(&t.id)),
            )
            .await?;
            tracing::debug!(
                step = session.state.current_step,
                tiles_written = touched.len(),
                "Committed game transaction"
            );
        }
        tx.commit().await?;
        Ok(out)
    }

    /// Load the stored game without locking it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if a query fails or
    /// [`DbError::Corrupt`] if a stored row is invalid.
    pub async fn snapshot(&self) -> Result<Option<GameSession>, DbError> {
        let mut conn = self.pool.pool().acquire().await?;
        load(&mut *conn, false).await
    }
}

// =========================================================================
// Loading
// =========================================================================

#[derive(Debug, sqlx::FromRow)]
struct GameStateRow {
    game_id: Uuid,
    current_step: i64,
    max_steps: i64,
    is_game_over: bool,
    map_rows: i64,
    map_cols: i64,
    started_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct PlayerRow {
    shovels: i64,
    drops: i64,
    score: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct TileRow {
    id: i64,
    grid_row: i64,
    grid_col: i64,
    zone_id: i64,
    tile_type: String,
    owner: Option<String>,
    crop_state: Option<String>,
    crop_type: Option<String>,
    stage_counter: i64,
    has_water_reserve: bool,
    has_firebreak: bool,
    temperature: f64,
    humidity: f64,
    last_irrigated_step: i64,
    irrigated_this_step: bool,
    exploited: String,
}

async fn load(conn: &mut PgConnection, lock: bool) -> Result<Option<GameSession>, DbError> {
    let sql = if lock {
        SELECT_STATE_FOR_UPDATE
    } else {
        SELECT_STATE
    };
    let Some(state_row) = sqlx::query_as::<_, GameStateRow>(sql)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };

    let player_row = sqlx::query_as::<_, PlayerRow>(
        r"SELECT shovels, drops, score FROM player WHERE slot = 1",
    )
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::Corrupt("game_state row without player row".to_owned()))?;

    let tile_rows = sqlx::query_as::<_, TileRow>(
        r"SELECT id, grid_row, grid_col, zone_id, tile_type, owner, crop_state, crop_type,
                 stage_counter, has_water_reserve, has_firebreak, temperature, humidity,
                 last_irrigated_step, irrigated_this_step, exploited
          FROM tiles
          ORDER BY id",
    )
    .fetch_all(&mut *conn)
    .await?;

    let state = GameState {
        game_id: GameId::from(state_row.game_id),
        current_step: to_u32(state_row.current_step, "current_step")?,
        max_steps: to_u32(state_row.max_steps, "max_steps")?,
        is_game_over: state_row.is_game_over,
        rows: to_u32(state_row.map_rows, "map_rows")?,
        cols: to_u32(state_row.map_cols, "map_cols")?,
        started_at: state_row.started_at,
    };
    let player = Player {
        shovels: to_u32(player_row.shovels, "shovels")?,
        drops: to_u32(player_row.drops, "drops")?,
        score: to_u32(player_row.score, "score")?,
    };

    let bounds = GridBounds::new(state.rows, state.cols)
        .map_err(|e| DbError::Corrupt(format!("stored map shape: {e}")))?;
    let tiles = tile_rows
        .into_iter()
        .map(tile_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    let grid = TileGrid::from_tiles(bounds, tiles)
        .map_err(|e| DbError::Corrupt(format!("stored tiles: {e}")))?;

    Ok(Some(GameSession::new(state, player, grid)))
}

fn tile_from_row(row: TileRow) -> Result<Tile, DbError> {
    let last_irrigated_step = if row.last_irrigated_step == NEVER_IRRIGATED {
        None
    } else {
        Some(to_u32(row.last_irrigated_step, "last_irrigated_step")?)
    };
    Ok(Tile {
        id: TileId(to_u32(row.id, "tile id")?),
        coord: GridCoord::new(
            to_u32(row.grid_row, "grid_row")?,
            to_u32(row.grid_col, "grid_col")?,
        ),
        zone_id: to_u32(row.zone_id, "zone_id")?,
        tile_type: parse::<TileType>(&row.tile_type)?,
        owner: row.owner.as_deref().map(parse::<Owner>).transpose()?,
        crop: row.crop_state.as_deref().map(parse::<CropState>).transpose()?,
        crop_type: row.crop_type,
        stage_counter: to_u32(row.stage_counter, "stage_counter")?,
        has_water_reserve: row.has_water_reserve,
        has_firebreak: row.has_firebreak,
        temperature: row.temperature,
        humidity: row.humidity,
        last_irrigated_step,
        irrigated_this_step: row.irrigated_this_step,
        exploited: parse::<ExploitMode>(&row.exploited)?,
    })
}

fn to_u32(value: i64, column: &str) -> Result<u32, DbError> {
    u32::try_from(value).map_err(|_| DbError::Corrupt(format!("{column} out of range: {value}")))
}

fn parse<T: FromStr<Err = UnknownVariant>>(value: &str) -> Result<T, DbError> {
    value.parse().map_err(|e: UnknownVariant| DbError::Corrupt(e.to_string()))
}

// =========================================================================
// Writing
// =========================================================================

async fn update_singletons(conn: &mut PgConnection, session: &GameSession) -> Result<(), DbError> {
    sqlx::query(
        r"UPDATE game_state
          SET current_step = $1, is_game_over = $2
          WHERE slot = 1",
    )
    .bind(i64::from(session.state.current_step))
    .bind(session.state.is_game_over)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r"UPDATE player
          SET shovels = $1, drops = $2, score = $3
          WHERE slot = 1",
    )
    .bind(i64::from(session.player.shovels))
    .bind(i64::from(session.player.drops))
    .bind(i64::from(session.player.score))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Insert or overwrite tiles in a single `UNNEST` statement.
async fn upsert_tiles<'a, I>(conn: &mut PgConnection, tiles: I) -> Result<(), DbError>
where
    I: Iterator<Item = &'a Tile>,
{
    let columns = TileColumns::collect(tiles);
    if columns.ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r"INSERT INTO tiles (id, grid_row, grid_col, zone_id, tile_type, owner, crop_state, crop_type,
                             stage_counter, has_water_reserve, has_firebreak, temperature, humidity,
                             last_irrigated_step, irrigated_this_step, exploited)
          SELECT * FROM UNNEST($1::BIGINT[], $2::BIGINT[], $3::BIGINT[], $4::BIGINT[], $5::TEXT[],
                               $6::TEXT[], $7::TEXT[], $8::TEXT[], $9::BIGINT[], $10::BOOLEAN[],
                               $11::BOOLEAN[], $12::FLOAT8[], $13::FLOAT8[], $14::BIGINT[],
                               $15::BOOLEAN[], $16::TEXT[])
          ON CONFLICT (id) DO UPDATE SET
            tile_type = EXCLUDED.tile_type,
            owner = EXCLUDED.owner,
            crop_state = EXCLUDED.crop_state,
            crop_type = EXCLUDED.crop_type,
            stage_counter = EXCLUDED.stage_counter,
            has_water_reserve = EXCLUDED.has_water_reserve,
            has_firebreak = EXCLUDED.has_firebreak,
            temperature = EXCLUDED.temperature,
            humidity = EXCLUDED.humidity,
            last_irrigated_step = EXCLUDED.last_irrigated_step,
            irrigated_this_step = EXCLUDED.irrigated_this_step,
            exploited = EXCLUDED.exploited",
    )
    .bind(&columns.ids)
    .bind(&columns.rows)
    .bind(&columns.cols)
    .bind(&columns.zone_ids)
    .bind(&columns.tile_types)
    .bind(&columns.owners)
    .bind(&columns.crop_states)
    .bind(&columns.crop_types)
    .bind(&columns.stage_counters)
    .bind(&columns.water_reserves)
    .bind(&columns.firebreaks)
    .bind(&columns.temperatures)
    .bind(&columns.humidities)
    .bind(&columns.last_irrigated)
    .bind(&columns.irrigated)
    .bind(&columns.exploited)
    .execute(&mut *conn)
    .await?;

    tracing::trace!(count = columns.ids.len(), "Upserted tiles (batch UNNEST)");
    Ok(())
}

/// Column-major copy of a batch of tiles for `UNNEST` binding.
#[derive(Default)]
struct TileColumns {
    ids: Vec<i64>,
    rows: Vec<i64>,
    cols: Vec<i64>,
    zone_ids: Vec<i64>,
    tile_types: Vec<String>,
    owners: Vec<Option<String>>,
    crop_states: Vec<Option<String>>,
    crop_types: Vec<Option<String>>,
    stage_counters: Vec<i64>,
    water_reserves: Vec<bool>,
    firebreaks: Vec<bool>,
    temperatures: Vec<f64>,
    humidities: Vec<f64>,
    last_irrigated: Vec<i64>,
    irrigated: Vec<bool>,
    exploited: Vec<String>,
}

impl TileColumns {
    fn collect<'a>(tiles: impl Iterator<Item = &'a Tile>) -> Self {
        let mut c = Self::default();
        for tile in tiles {
            c.ids.push(i64::from(tile.id.get()));
            c.rows.push(i64::from(tile.coord.row));
            c.cols.push(i64::from(tile.coord.col));
            c.zone_ids.push(i64::from(tile.zone_id));
            c.tile_types.push(tile.tile_type.as_str().to_owned());
            c.owners.push(tile.owner.map(|o| o.as_str().to_owned()));
            c.crop_states.push(tile.crop.map(|s| s.as_str().to_owned()));
            c.crop_types.push(tile.crop_type.clone());
            c.stage_counters.push(i64::from(tile.stage_counter));
            c.water_reserves.push(tile.has_water_reserve);
            c.firebreaks.push(tile.has_firebreak);
            c.temperatures.push(tile.temperature);
            c.humidities.push(tile.humidity);
            c.last_irrigated
                .push(tile.last_irrigated_step.map_or(NEVER_IRRIGATED, i64::from));
            c.irrigated.push(tile.irrigated_this_step);
            c.exploited.push(tile.exploited.as_str().to_owned());
        }
        c
    }
}
