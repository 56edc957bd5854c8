//! Authoritative state of one live game.
//!
//! `GameSession` wraps a [`Board`] and enforces the state machine
//! `waiting -> playing -> finished`. All mutation goes through
//! [`GameSession::apply_move`]; callers serialize access per session.

use time::OffsetDateTime;
use tokio::time::Instant;
use uuid::Uuid;

use crate::domain::board::Board;
use crate::domain::errors::MoveError;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::{
    AppliedMove, GameId, GameStatus, MoveOutcome, Player, PlayerId, Seat,
};
use crate::errors::domain::{ConflictKind, DomainError};

#[derive(Debug, Clone)]
pub struct GameSession {
    id: GameId,
    player1: Player,
    player2: Option<Player>,
    board: Board,
    current_turn: Seat,
    status: GameStatus,
    winner: Option<Seat>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    finished_at: Option<OffsetDateTime>,
    last_activity: Instant,
}

impl GameSession {
    /// A new session with only seat one filled.
    pub fn new(player1: Player) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            player1: player1.seated(Seat::One),
            player2: None,
            board: Board::new(),
            current_turn: Seat::One,
            status: GameStatus::Waiting,
            winner: None,
            created_at: now,
            updated_at: now,
            finished_at: None,
            last_activity: Instant::now(),
        }
    }

    /// Convenience for matchmaking: both seats filled, ready to play.
    pub fn paired(player1: Player, player2: Player) -> Self {
        let mut session = Self::new(player1);
        session.player2 = Some(player2.seated(Seat::Two));
        session.status = GameStatus::Playing;
        session
    }

    /// Fill seat two and start the game.
    pub fn add_player2(&mut self, player2: Player) -> Result<(), DomainError> {
        if self.status != GameStatus::Waiting {
            return Err(DomainError::conflict(
                ConflictKind::SeatTaken,
                format!("game {} is no longer waiting for a player", self.id),
            ));
        }
        self.player2 = Some(player2.seated(Seat::Two));
        self.status = GameStatus::Playing;
        self.touch();
        Ok(())
    }

    /// Drop a piece for `seat` into `column`.
    ///
    /// Preconditions are checked before anything changes: the game must be
    /// playing, it must be `seat`'s turn, and the column must have room.
    pub fn apply_move(&mut self, column: usize, seat: Seat) -> Result<AppliedMove, MoveError> {
        if self.status != GameStatus::Playing {
            return Err(MoveError::NotPlaying);
        }
        if seat != self.current_turn {
            return Err(MoveError::NotYourTurn);
        }
        let row = self.board.drop_piece(column, seat)?;
        self.touch();

        let outcome = if self.board.is_winning_cell(row, column, seat) {
            self.finish(Some(seat));
            MoveOutcome::Win
        } else if self.board.is_full() {
            self.finish(None);
            MoveOutcome::Draw
        } else {
            self.current_turn = seat.other();
            MoveOutcome::Continue
        };

        Ok(AppliedMove {
            column,
            row,
            seat,
            outcome,
        })
    }

    fn finish(&mut self, winner: Option<Seat>) {
        self.status = GameStatus::Finished;
        self.winner = winner;
        self.finished_at = Some(self.updated_at);
    }

    fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
        self.last_activity = Instant::now();
    }

    pub fn available_columns(&self) -> Vec<usize> {
        self.board.available_columns()
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current_turn(&self) -> Seat {
        self.current_turn
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|seat| self.player(seat))
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        match seat {
            Seat::One => Some(&self.player1),
            Seat::Two => self.player2.as_ref(),
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        std::iter::once(&self.player1).chain(self.player2.as_ref())
    }

    /// Seat held by `player_id`, if they are part of this game.
    pub fn seat_of(&self, player_id: PlayerId) -> Option<Seat> {
        self.players()
            .find(|player| player.id == player_id)
            .map(|player| player.seat)
    }

    /// Seat controlled by the computer opponent, if any.
    pub fn bot_seat(&self) -> Option<Seat> {
        self.players()
            .find(|player| player.is_bot())
            .map(|player| player.seat)
    }

    pub fn is_bot_game(&self) -> bool {
        self.bot_seat().is_some()
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id,
            player1: self.player1.clone(),
            player2: self.player2.clone(),
            board: self.board.to_rows(),
            current_turn: self.current_turn,
            status: self.status,
            winner: self.winner().cloned(),
            is_bot: self.is_bot_game(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            finished_at: self.finished_at,
        }
    }
}
