//! Registry of live game sessions.
//!
//! Lookups take the read side of the lock and run concurrently; inserts and
//! removals are exclusive. Each session sits behind its own mutex so moves in
//! different games never contend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;

use crate::domain::{GameId, GameSession, GameStatus, PlayerId};

pub type SharedSession = Arc<Mutex<GameSession>>;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<GameId, SharedSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session and hand back the shared handle.
    pub fn insert(&self, session: GameSession) -> SharedSession {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.write().insert(id, Arc::clone(&shared));
        shared
    }

    pub fn get(&self, id: GameId) -> Option<SharedSession> {
        self.sessions.read().get(&id).cloned()
    }

    pub fn remove(&self, id: GameId) -> Option<SharedSession> {
        self.sessions.write().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// True when `player_id` holds a seat in `id` and that game is still
    /// being played. Viewers attached through rejoin hold no seat.
    pub fn holds_live_seat(&self, id: GameId, player_id: PlayerId) -> bool {
        self.get(id).is_some_and(|s| {
            let session = s.lock();
            let seated = session.status() == GameStatus::Playing
                && session.seat_of(player_id).is_some();
            seated
        })
    }

    /// Drop every unfinished session idle for at least `max_idle` as of `now`
    /// and return them.
    pub fn remove_idle(&self, max_idle: Duration, now: Instant) -> Vec<SharedSession> {
        let mut sessions = self.sessions.write();
        let stale: Vec<GameId> = sessions
            .iter()
            .filter(|(_, s)| {
                let s = s.lock();
                s.status() != GameStatus::Finished
                    && now.saturating_duration_since(s.last_activity()) >= max_idle
            })
            .map(|(id, _)| *id)
            .collect();
        stale
            .into_iter()
            .filter_map(|id| sessions.remove(&id))
            .collect()
    }
}
