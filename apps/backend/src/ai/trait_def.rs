//! Computer opponent trait definition.

use thiserror::Error;

use crate::domain::{Board, Seat};

/// Errors that can occur during opponent decision-making.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AiError {
    /// The board has no open column
    #[error("AI has no legal move")]
    NoLegalMove,
}

/// Trait for computer opponents.
///
/// Implementations receive an immutable board snapshot and the seat they
/// play for, and must return an open column.
pub trait AiPlayer: Send + Sync {
    fn choose_column(&self, board: &Board, seat: Seat) -> Result<usize, AiError>;
}
