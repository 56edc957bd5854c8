// Proptest generators and oracles for board and session tests.

use proptest::prelude::*;

use crate::domain::board::Board;
use crate::domain::rules::{COLS, ROWS};
use crate::domain::state::Seat;

/// Any column index, including full ones.
pub fn column() -> impl Strategy<Value = usize> {
    0..COLS
}

/// A sequence of column choices long enough to fill the grid.
pub fn column_sequence() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(column(), 1..(ROWS * COLS * 2))
}

pub fn seat() -> impl Strategy<Value = Seat> {
    prop_oneof![Just(Seat::One), Just(Seat::Two)]
}

/// Independent full-grid scan for four in a row, used to cross-check the
/// ray-based detection in `Board`.
pub fn oracle_has_line(board: &Board, seat: Seat) -> bool {
    let owns = |r: isize, c: isize| {
        r >= 0
            && c >= 0
            && (r as usize) < ROWS
            && (c as usize) < COLS
            && board.cell(r as usize, c as usize) == Some(seat)
    };
    for r in 0..ROWS as isize {
        for c in 0..COLS as isize {
            for (dr, dc) in [(0, 1), (1, 0), (1, 1), (1, -1)] {
                if (0..4).all(|k| owns(r + dr * k, c + dc * k)) {
                    return true;
                }
            }
        }
    }
    false
}
