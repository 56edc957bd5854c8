use thiserror::Error;

/// Rule violations raised by the board and the session state machine.
///
/// A failed move never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game is not in playing state")]
    NotPlaying,
    #[error("not your turn")]
    NotYourTurn,
    #[error("column is full")]
    ColumnFull,
    #[error("column {0} is out of range")]
    InvalidColumn(i64),
    #[error("you are not a player in this game")]
    NotAParticipant,
}

impl MoveError {
    pub fn code(&self) -> &'static str {
        match self {
            MoveError::NotPlaying => "not_playing",
            MoveError::NotYourTurn => "not_your_turn",
            MoveError::ColumnFull => "column_full",
            MoveError::InvalidColumn(_) => "invalid_column",
            MoveError::NotAParticipant => "not_a_participant",
        }
    }
}
