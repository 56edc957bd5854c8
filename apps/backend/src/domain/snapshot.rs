//! Serializable view of a session, sent to clients and handed to persistence.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::state::{GameId, GameStatus, Player, PlayerId, PlayerKind, Seat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub player1: Player,
    pub player2: Option<Player>,
    /// Rows top first; 0 is empty, 1 and 2 are seats.
    pub board: Vec<Vec<u8>>,
    pub current_turn: Seat,
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
    pub is_bot: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub finished_at: Option<OffsetDateTime>,
}

impl GameSnapshot {
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        std::iter::once(&self.player1).chain(self.player2.as_ref())
    }

    pub fn humans(&self) -> impl Iterator<Item = &Player> {
        self.players().filter(|p| p.kind == PlayerKind::Human)
    }

    /// Delivery targets for notifications about this game.
    pub fn human_ids(&self) -> Vec<PlayerId> {
        self.humans().map(|p| p.id).collect()
    }
}
