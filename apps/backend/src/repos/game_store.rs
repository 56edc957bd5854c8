//! Game store: the archive of finished games and the leaderboard behind it.
//!
//! Gameplay never depends on these calls succeeding. The coordinator logs
//! store failures and carries on.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;

use crate::domain::{GameId, GameSnapshot, GameStatus};
use crate::errors::domain::{DomainError, InfraErrorKind};

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub total_games: u32,
}

impl LeaderboardEntry {
    fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            wins: 0,
            losses: 0,
            draws: 0,
            total_games: 0,
        }
    }
}

/// Archived copy of a finished game.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedGame {
    pub snapshot: GameSnapshot,
    pub duration_secs: i64,
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Make sure a tally row exists for `username`.
    async fn ensure_player(&self, username: &str) -> Result<(), DomainError>;

    /// Archive a finished game.
    async fn record_finished_game(&self, game: &GameSnapshot) -> Result<(), DomainError>;

    /// Update the win/loss/draw tallies of the human participants.
    async fn record_outcome(&self, game: &GameSnapshot) -> Result<(), DomainError>;

    /// Best `limit` players by wins, then games played, then name.
    async fn top_players(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError>;
}

#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: RwLock<HashMap<GameId, FinishedGame>>,
    players: RwLock<HashMap<String, LeaderboardEntry>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finished_game(&self, id: GameId) -> Option<FinishedGame> {
        self.games.read().get(&id).cloned()
    }

    pub fn finished_count(&self) -> usize {
        self.games.read().len()
    }

    pub fn player(&self, username: &str) -> Option<LeaderboardEntry> {
        self.players.read().get(username).cloned()
    }
}

fn ensure_finished(game: &GameSnapshot) -> Result<(), DomainError> {
    if game.status != GameStatus::Finished {
        return Err(DomainError::infra(
            InfraErrorKind::Other("Unfinished game".to_string()),
            format!("game {} is not finished", game.id),
        ));
    }
    Ok(())
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn ensure_player(&self, username: &str) -> Result<(), DomainError> {
        self.players
            .write()
            .entry(username.to_string())
            .or_insert_with(|| LeaderboardEntry::new(username));
        Ok(())
    }

    async fn record_finished_game(&self, game: &GameSnapshot) -> Result<(), DomainError> {
        ensure_finished(game)?;
        let finished_at = game.finished_at.unwrap_or(game.updated_at);
        let duration_secs = (finished_at - game.created_at).whole_seconds();
        self.games.write().insert(
            game.id,
            FinishedGame {
                snapshot: game.clone(),
                duration_secs,
            },
        );
        Ok(())
    }

    async fn record_outcome(&self, game: &GameSnapshot) -> Result<(), DomainError> {
        ensure_finished(game)?;
        let winner_id = game.winner.as_ref().map(|w| w.id);
        let mut players = self.players.write();
        for player in game.humans() {
            let entry = players
                .entry(player.username.clone())
                .or_insert_with(|| LeaderboardEntry::new(&player.username));
            entry.total_games += 1;
            match winner_id {
                None => entry.draws += 1,
                Some(id) if id == player.id => entry.wins += 1,
                Some(_) => entry.losses += 1,
            }
        }
        Ok(())
    }

    async fn top_players(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError> {
        let mut entries: Vec<LeaderboardEntry> = self.players.read().values().cloned().collect();
        entries.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then_with(|| b.total_games.cmp(&a.total_games))
                .then_with(|| a.username.cmp(&b.username))
        });
        entries.truncate(limit);
        Ok(entries)
    }
}
