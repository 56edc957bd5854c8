//! Persistence collaborator for finished games and per-player tallies.

pub mod game_store;

pub use game_store::{FinishedGame, GameStore, InMemoryGameStore, LeaderboardEntry};
