//! Domain layer: pure game logic types and helpers.

pub mod board;
pub mod errors;
pub mod rules;
pub mod session;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_session;

// Re-exports for ergonomics
pub use board::Board;
pub use errors::MoveError;
pub use rules::{COLS, ROWS};
pub use session::GameSession;
pub use snapshot::GameSnapshot;
pub use state::{
    AppliedMove, GameId, GameStatus, MoveOutcome, Player, PlayerId, PlayerKind, Seat,
};
