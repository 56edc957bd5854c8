//! Matchmaking queue.
//!
//! `enqueue`, `try_pair_with` and `cancel` all run under one mutex, so a
//! waiting entry can be claimed by at most one pairing. Pairing removes both
//! entries, registers the new session and signals both waiters before the
//! lock is released.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{GameSession, Player, PlayerId, Seat};
use crate::services::sessions::{SessionRegistry, SharedSession};

/// Single-use pairing notification handed to a waiting player.
pub type MatchReceiver = oneshot::Receiver<SharedSession>;

#[derive(Debug)]
struct WaitingEntry {
    player: Player,
    enqueued_at: Instant,
    notify: oneshot::Sender<SharedSession>,
}

#[derive(Debug)]
pub struct Matchmaker {
    waiting: Mutex<Vec<WaitingEntry>>,
    sessions: Arc<SessionRegistry>,
}

impl Matchmaker {
    pub fn new(sessions: Arc<SessionRegistry>) -> Self {
        Self {
            waiting: Mutex::new(Vec::new()),
            sessions,
        }
    }

    /// Queue `player` and return the receiver that fires when someone pairs
    /// with them. Re-queueing replaces the previous entry, whose receiver
    /// then resolves with an error.
    pub fn enqueue(&self, player: Player) -> MatchReceiver {
        let (notify, rx) = oneshot::channel();
        let mut waiting = self.waiting.lock();
        waiting.retain(|e| e.player.id != player.id);
        debug!(player_id = %player.id, queued = waiting.len() + 1, "Player enqueued");
        waiting.push(WaitingEntry {
            player,
            enqueued_at: Instant::now(),
            notify,
        });
        rx
    }

    /// Pair `player_id` with the longest-waiting other entry.
    ///
    /// The caller takes seat one. Returns the registered session and the
    /// opponent, or `None` if the caller is not queued or nobody else is.
    pub fn try_pair_with(&self, player_id: PlayerId) -> Option<(SharedSession, Player)> {
        let mut waiting = self.waiting.lock();
        let me = waiting.iter().position(|e| e.player.id == player_id)?;
        let other = waiting.iter().position(|e| e.player.id != player_id)?;

        // Remove the higher index first so the lower one stays valid.
        let (first, second) = if me > other { (me, other) } else { (other, me) };
        let a = waiting.remove(first);
        let b = waiting.remove(second);
        drop(waiting);
        let (caller, opponent) = if a.player.id == player_id { (a, b) } else { (b, a) };

        let player1 = caller.player.seated(Seat::One);
        let player2 = opponent.player.seated(Seat::Two);
        let session = self
            .sessions
            .insert(GameSession::paired(player1, player2.clone()));

        debug!(
            player_id = %player_id,
            opponent_id = %player2.id,
            waited_ms = opponent.enqueued_at.elapsed().as_millis() as u64,
            "Players paired"
        );

        // A waiter that already gave up has dropped its receiver; nothing to do.
        let _ = caller.notify.send(Arc::clone(&session));
        let _ = opponent.notify.send(Arc::clone(&session));

        Some((session, player2))
    }

    /// Remove `player_id` from the queue. Returns false if it was not there,
    /// which means a pairing already claimed it.
    pub fn cancel(&self, player_id: PlayerId) -> bool {
        let mut waiting = self.waiting.lock();
        let before = waiting.len();
        waiting.retain(|e| e.player.id != player_id);
        waiting.len() != before
    }

    pub fn is_waiting(&self, player_id: PlayerId) -> bool {
        self.waiting.lock().iter().any(|e| e.player.id == player_id)
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.lock().len()
    }
}
