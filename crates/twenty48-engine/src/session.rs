//! Session store: one `Game` per session id, safe to share across request
//! handlers.
//!
//! Locking: the map sits behind an `RwLock` that is only held to look up,
//! insert or remove an entry. Each game has its own `Mutex`, held for one
//! whole engine operation, so two requests against the same session never
//! interleave while different sessions run in parallel.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::game::clock_seed;
use crate::engine::{Game, Snapshot};

/// Opaque session identifier (32 lowercase hex characters when minted here).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        SessionId(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_string())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("game session {0} not found")]
    NotFound(SessionId),
    #[error("session limit of {0} reached")]
    Full(usize),
}

pub type SharedGame = Arc<Mutex<Game>>;

pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SharedGame>>,
    // Draws session ids and per-game seeds.
    seeder: Mutex<StdRng>,
    max_sessions: usize,
}

impl SessionStore {
    /// Store seeded from the wall clock.
    pub fn new(max_sessions: usize) -> Self {
        Self::with_seed(clock_seed(), max_sessions)
    }

    /// Store whose session ids and games are fully determined by `seed`.
    pub fn with_seed(seed: u64, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            seeder: Mutex::new(StdRng::seed_from_u64(seed)),
            max_sessions,
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a new game and return its id together with its first snapshot.
    pub fn create(&self) -> Result<(SessionId, Snapshot), SessionError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.len() >= self.max_sessions {
            return Err(SessionError::Full(self.max_sessions));
        }
        let (id, game) = {
            let mut seeder = lock(&self.seeder);
            let mut id = mint_id(&mut *seeder);
            while sessions.contains_key(&id) {
                id = mint_id(&mut *seeder);
            }
            (id, Game::from_seed(seeder.next_u64()))
        };
        let snapshot = game.snapshot();
        sessions.insert(id.clone(), Arc::new(Mutex::new(game)));
        debug!(session = %id, live = sessions.len(), "session created");
        Ok((id, snapshot))
    }

    /// Shared handle to a session's game.
    pub fn get(&self, id: &SessionId) -> Result<SharedGame, SessionError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Run `f` against the session's game while holding its lock.
    pub fn with_game<T>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut Game) -> T,
    ) -> Result<T, SessionError> {
        let game = self.get(id)?;
        let mut guard = lock(&game);
        Ok(f(&mut *guard))
    }

    /// Reset a session's game in place and return the fresh snapshot.
    pub fn reset(&self, id: &SessionId) -> Result<Snapshot, SessionError> {
        let snapshot = self.with_game(id, |game| {
            game.reset();
            game.snapshot()
        })?;
        debug!(session = %id, "session reset");
        Ok(snapshot)
    }

    /// Discard a session. Handles obtained earlier through `get` stay usable
    /// but are no longer reachable by id.
    pub fn remove(&self, id: &SessionId) -> Result<(), SessionError> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        match removed {
            Some(_) => {
                debug!(session = %id, "session removed");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.clone())),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

// Engine operations never panic half-way, so a poisoned lock still guards a
// consistent game.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn mint_id<R: RngCore + ?Sized>(rng: &mut R) -> SessionId {
    SessionId(format!("{:016x}{:016x}", rng.next_u64(), rng.next_u64()))
}
