//! Property-based tests for the session state machine and win detection.

use proptest::prelude::*;
use uuid::Uuid;

use crate::domain::errors::MoveError;
use crate::domain::rules::{COLS, ROWS};
use crate::domain::session::GameSession;
use crate::domain::state::{GameStatus, MoveOutcome, Player, Seat};
use crate::domain::{test_gens, test_prelude};

fn fresh() -> GameSession {
    GameSession::paired(
        Player::human(Uuid::new_v4(), "p1", Seat::One),
        Player::human(Uuid::new_v4(), "p2", Seat::Two),
    )
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: two consecutive accepted moves never come from the same seat,
    /// and the seat not on turn is always refused.
    #[test]
    fn prop_turns_strictly_alternate(cols in test_gens::column_sequence()) {
        let mut session = fresh();
        let mut last_seat: Option<Seat> = None;
        for col in cols {
            if session.status() != GameStatus::Playing {
                break;
            }
            let on_turn = session.current_turn();
            let before = session.board().clone();
            prop_assert_eq!(session.apply_move(col, on_turn.other()), Err(MoveError::NotYourTurn));
            prop_assert_eq!(session.board(), &before);

            if let Ok(applied) = session.apply_move(col, on_turn) {
                prop_assert_ne!(Some(applied.seat), last_seat);
                last_seat = Some(applied.seat);
            }
        }
    }

    /// Property: a column takes exactly ROWS pieces before it drops out of
    /// the available set.
    #[test]
    fn prop_column_capacity(col in test_gens::column(), seats in prop::collection::vec(test_gens::seat(), ROWS..ROWS + 3)) {
        let mut board = crate::domain::board::Board::new();
        for (i, seat) in seats.into_iter().enumerate() {
            let result = board.drop_piece(col, seat);
            if i < ROWS {
                prop_assert!(result.is_ok());
                prop_assert_eq!(board.available_columns().contains(&col), i + 1 < ROWS);
            } else {
                prop_assert_eq!(result, Err(MoveError::ColumnFull));
            }
        }
        prop_assert_eq!(board.available_columns().len(), COLS - 1);
    }

    /// Property: a win is reported exactly on the move that first creates a
    /// line (cross-checked by a full scan), and a full board without a line
    /// is a draw.
    #[test]
    fn prop_win_and_draw_agree_with_oracle(cols in test_gens::column_sequence()) {
        let mut session = fresh();
        for col in cols {
            if session.status() != GameStatus::Playing {
                break;
            }
            let seat = session.current_turn();
            prop_assert!(!test_gens::oracle_has_line(session.board(), seat));
            let Ok(applied) = session.apply_move(col, seat) else {
                continue;
            };
            let has_line = test_gens::oracle_has_line(session.board(), seat);
            match applied.outcome {
                MoveOutcome::Win => {
                    prop_assert!(has_line);
                    prop_assert!(session.board().is_winning_cell(applied.row, col, seat));
                    prop_assert_eq!(session.winner().map(|p| p.seat), Some(seat));
                }
                MoveOutcome::Draw => {
                    prop_assert!(!has_line);
                    prop_assert!(session.board().is_full());
                    prop_assert!(session.winner().is_none());
                }
                MoveOutcome::Continue => {
                    prop_assert!(!has_line);
                    prop_assert!(!session.board().is_full());
                    prop_assert_eq!(session.current_turn(), seat.other());
                }
            }
            prop_assert_eq!(session.status() == GameStatus::Finished, applied.outcome.is_terminal());
        }
    }
}
