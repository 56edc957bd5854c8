//! Fixed 6x7 grid and the pure drop/win/draw rules.
//!
//! Row 0 is the top of the grid; pieces settle at the highest row index that
//! is still empty, so every column fills bottom-up without gaps.

use crate::domain::errors::MoveError;
use crate::domain::rules::{AXES, COLS, CONNECT, ROWS};
use crate::domain::state::Seat;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    grid: [[Option<Seat>; COLS]; ROWS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Seat> {
        self.grid.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// True when `col` is on the board and its top cell is empty.
    pub fn is_open(&self, col: usize) -> bool {
        col < COLS && self.grid[0][col].is_none()
    }

    /// Number of pieces currently stacked in `col`.
    pub fn height(&self, col: usize) -> usize {
        if col >= COLS {
            return 0;
        }
        (0..ROWS).filter(|&row| self.grid[row][col].is_some()).count()
    }

    /// Drop a piece for `seat` into `col`, returning the landing row.
    pub fn drop_piece(&mut self, col: usize, seat: Seat) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col as i64));
        }
        let row = (0..ROWS)
            .rev()
            .find(|&row| self.grid[row][col].is_none())
            .ok_or(MoveError::ColumnFull)?;
        self.grid[row][col] = Some(seat);
        Ok(row)
    }

    /// Length of the contiguous run of `seat` through (`row`, `col`) along
    /// one axis, counting both directions and the cell itself.
    pub fn run_length(&self, row: usize, col: usize, axis: (isize, isize), seat: Seat) -> usize {
        if self.cell(row, col) != Some(seat) {
            return 0;
        }
        1 + self.count_direction(row, col, axis, seat)
            + self.count_direction(row, col, (-axis.0, -axis.1), seat)
    }

    fn count_direction(&self, row: usize, col: usize, step: (isize, isize), seat: Seat) -> usize {
        let mut count = 0;
        let mut r = row as isize + step.0;
        let mut c = col as isize + step.1;
        while (0..ROWS as isize).contains(&r)
            && (0..COLS as isize).contains(&c)
            && self.grid[r as usize][c as usize] == Some(seat)
        {
            count += 1;
            r += step.0;
            c += step.1;
        }
        count
    }

    /// Whether the piece at (`row`, `col`) completes a line for `seat`.
    pub fn is_winning_cell(&self, row: usize, col: usize, seat: Seat) -> bool {
        AXES
            .iter()
            .any(|&axis| self.run_length(row, col, axis, seat) >= CONNECT)
    }

    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| !self.is_open(col))
    }

    /// Columns whose top cell is empty, in ascending order.
    pub fn available_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.is_open(col)).collect()
    }

    pub fn piece_count(&self) -> usize {
        self.grid.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// Grid as rows of 0 (empty), 1 or 2, top row first.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.grid
            .iter()
            .map(|row| row.iter().map(|cell| cell.map_or(0, Seat::number)).collect())
            .collect()
    }
}
