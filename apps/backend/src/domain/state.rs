use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PlayerId = Uuid;
pub type GameId = Uuid;

/// One of the two fixed positions in a game. Seat one always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.number()
    }
}

impl TryFrom<u8> for Seat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Seat::One),
            2 => Ok(Seat::Two),
            other => Err(format!("seat must be 1 or 2, got {other}")),
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Human,
    Bot,
}

/// A participant bound to a seat at pairing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub seat: Seat,
    pub kind: PlayerKind,
}

impl Player {
    pub const BOT_NAME: &'static str = "Bot";

    pub fn human(id: PlayerId, username: impl Into<String>, seat: Seat) -> Self {
        Self {
            id,
            username: username.into(),
            seat,
            kind: PlayerKind::Human,
        }
    }

    pub fn bot(seat: Seat) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: Self::BOT_NAME.to_string(),
            seat,
            kind: PlayerKind::Bot,
        }
    }

    pub fn is_bot(&self) -> bool {
        self.kind == PlayerKind::Bot
    }

    pub fn seated(mut self, seat: Seat) -> Self {
        self.seat = seat;
        self
    }
}

/// Lifecycle of a session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

/// Result of a successfully applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    Continue,
    Win,
    Draw,
}

impl MoveOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MoveOutcome::Continue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub column: usize,
    pub row: usize,
    pub seat: Seat,
    pub outcome: MoveOutcome,
}
