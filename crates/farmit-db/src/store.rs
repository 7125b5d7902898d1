//! Backend-agnostic store handle.
//!
//! [`GameStore`] dispatches to the in-memory or the `PostgreSQL` backend so
//! callers drive a game the same way whichever one is configured.

use farmit_core::{GameError, GameSession};

use crate::error::DbError;
use crate::game_store::PgGameStore;
use crate::memory::MemoryStore;
use crate::postgres::PostgresPool;

/// Storage for the single running game.
#[derive(Debug)]
pub enum GameStore {
    /// Process-local storage; the game is lost on exit.
    Memory(MemoryStore),
    /// Durable storage in `PostgreSQL`.
    Postgres(PgGameStore),
}

impl GameStore {
    /// Pick a backend: `PostgreSQL` when `url` is set, memory otherwise.
    ///
    /// The `PostgreSQL` pool is connected, migrated and slot-checked before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if connecting, migrating or the slot check fails.
    pub async fn open(url: Option<&str>, max_connections: Option<u32>) -> Result<Self, DbError> {
        let Some(url) = url else {
            tracing::info!("No database configured, using in-memory store");
            return Ok(Self::Memory(MemoryStore::new()));
        };
        let pool = PostgresPool::open(url, max_connections).await?;
        Ok(Self::Postgres(PgGameStore::new(pool)))
    }

    /// Short name of the active backend, for logs.
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Replace the stored game with `session`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot write the game.
    pub async fn start(&mut self, session: GameSession) -> Result<(), DbError> {
        match self {
            Self::Memory(store) => {
                store.start(session);
                Ok(())
            }
            Self::Postgres(store) => store.start(session).await,
        }
    }

    /// Run `op` on the stored game as one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Game`] if `op` fails and a storage error if the
    /// backend fails. Either way nothing is written.
    pub async fn transact<T, F>(&mut self, op: F) -> Result<T, DbError>
    where
        F: FnOnce(Option<&mut GameSession>) -> Result<T, GameError>,
    {
        match self {
            Self::Memory(store) => store.transact(op),
            Self::Postgres(store) => store.transact(op).await,
        }
    }

    /// Like [`transact`](Self::transact) for operations that need a game:
    /// `op` is not run and [`GameError::NotInitialized`] is returned when
    /// none is stored.
    ///
    /// # Errors
    ///
    /// As for [`transact`](Self::transact).
    pub async fn with_game<T, F>(&mut self, op: F) -> Result<T, DbError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, GameError>,
    {
        self.transact(|session| op(session.ok_or(GameError::NotInitialized)?))
            .await
    }

    /// A copy of the stored game, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot read the game.
    pub async fn snapshot(&self) -> Result<Option<GameSession>, DbError> {
        match self {
            Self::Memory(store) => Ok(store.snapshot()),
            Self::Postgres(store) => store.snapshot().await,
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Self::Postgres(store) = self {
            store.pool().close().await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use farmit_core::{FarmConfig, actions, new_game};
    use farmit_types::TileId;
    use farmit_world::{GridBounds, LandMap};

    use super::*;

    #[tokio::test]
    async fn no_url_selects_memory() {
        let store = GameStore::open(None, None).await.unwrap();
        assert_eq!(store.backend(), "memory");
        assert!(store.snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn action_without_game_is_not_initialized() {
        let mut store = GameStore::open(None, None).await.unwrap();
        let config = FarmConfig::default();
        let err = store
            .with_game(|s| actions::buy(s, &config, TileId(1)))
            .await
            .err();
        assert!(matches!(err, Some(DbError::Game(GameError::NotInitialized))));
    }

    #[tokio::test]
    async fn action_result_is_persisted() {
        let mut store = GameStore::open(None, None).await.unwrap();
        let config = FarmConfig::default();
        let mut map = LandMap::uniform(GridBounds::new(2, 2).unwrap(), 1, 0.3, 12.0);
        store.start(new_game(&mut map, &config).unwrap()).await.unwrap();

        let result = store
            .with_game(|s| actions::buy(s, &config, TileId(2)))
            .await
            .unwrap();
        assert!(result.success);
        let session = store.snapshot().await.unwrap().unwrap();
        assert_eq!(session.player.shovels, 2);
        assert_eq!(session.owned_tile_ids(), vec![TileId(2)]);
    }
}
