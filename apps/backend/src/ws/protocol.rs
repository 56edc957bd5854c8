use serde::{Deserialize, Serialize};

use crate::domain::{GameSnapshot, Player, Seat};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    FindMatch,
    /// Column is signed so out-of-range input reaches the rules check
    /// instead of failing to parse.
    MakeMove { column: i64 },
    /// Kept as text so an unparseable id still gets a "Game not found"
    /// reply rather than being dropped as malformed.
    Rejoin { game_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Draw,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    GameStart {
        game: GameSnapshot,
    },

    MoveMade {
        column: usize,
        row: usize,
        player: Seat,
        game: GameSnapshot,
    },

    GameEnd {
        result: GameResult,
        winner: Option<Player>,
        game: GameSnapshot,
    },

    Error {
        message: String,
    },

    RejoinSuccess {
        game: GameSnapshot,
    },
}

impl ServerMsg {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMsg::Error {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerMsg::GameStart { .. } => "game_start",
            ServerMsg::MoveMade { .. } => "move_made",
            ServerMsg::GameEnd { .. } => "game_end",
            ServerMsg::Error { .. } => "error",
            ServerMsg::RejoinSuccess { .. } => "rejoin_success",
        }
    }
}
