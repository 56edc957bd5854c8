pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Contiguous pieces needed along one axis to win.
pub const CONNECT: usize = 4;

/// The four ray axes through a cell: horizontal, vertical and both diagonals.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// Column preference used when nothing better is known: center outward.
pub const CENTER_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

/// Positional bonus awarded to a landing column by the opponent's evaluator.
pub fn centrality_bonus(col: usize) -> i32 {
    match col {
        3 => 5,
        2 | 4 => 3,
        _ => 0,
    }
}
