//! Computer opponents.
//!
//! - [`HeuristicOpponent`]: win, block, setup scoring, center preference, with
//!   an occasional deliberate random move
//! - [`RandomPlayer`]: uniform random open column (seedable for tests)
//! - [`registry`]: lookup of opponents by stable name

mod config;
mod heuristic;
mod random;
pub mod registry;
mod trait_def;

pub use config::AiConfig;
pub use heuristic::HeuristicOpponent;
pub use random::RandomPlayer;
pub use trait_def::{AiError, AiPlayer};
