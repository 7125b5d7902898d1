//! In-process store used when no database is configured.
//!
//! Each call runs against a copy of the session; the copy replaces the
//! stored session only when the operation returns `Ok`. A failed call
//! therefore leaves the previous state untouched, the same guarantee the
//! `PostgreSQL` store gets from rolling back its transaction.

use farmit_core::{GameError, GameSession};

use crate::error::DbError;

/// Holds at most one game in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    session: Option<GameSession>,
}

impl MemoryStore {
    /// An empty store with no game.
    pub const fn new() -> Self {
        Self { session: None }
    }

    /// Replace whatever game is stored with `session`.
    pub fn start(&mut self, mut session: GameSession) {
        session.take_touched();
        self.session = Some(session);
    }

    /// Run `op` as one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Game`] if `op` fails; the stored game is then
    /// left as it was.
    pub fn transact<T, F>(&mut self, op: F) -> Result<T, DbError>
    where
        F: FnOnce(Option<&mut GameSession>) -> Result<T, GameError>,
    {
        let mut working = self.session.clone();
        let out = op(working.as_mut())?;
        if let Some(session) = working.as_mut() {
            session.take_touched();
        }
        self.session = working;
        Ok(out)
    }

    /// A copy of the stored game, if any.
    pub fn snapshot(&self) -> Option<GameSession> {
        self.session.clone()
    }
}
