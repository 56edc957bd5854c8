//! Rule-based opponent that stands in for a human in seat two.
//!
//! Decision order, first match wins:
//! 1. Win now: a column that completes four for the bot.
//! 2. Block: a column that would complete four for the opponent.
//! 3. Best setup: simulate each open column and score the landing cell by the
//!    runs it extends (`10 * len` for every axis run of two or more) plus a
//!    centrality bonus. The strictly highest positive score wins; ties keep
//!    the first column considered.
//! 4. Center preference: first open column in center-outward order.
//! 5. Uniform random among open columns.
//!
//! With `mistake_rate > 0` the policy skips straight to step 5 on that
//! fraction of turns. With a zero rate the choice is a pure function of the
//! board and seat.

use parking_lot::Mutex;
use rand::prelude::*;

use crate::ai::config::AiConfig;
use crate::ai::trait_def::{AiError, AiPlayer};
use crate::domain::rules::{centrality_bonus, AXES, CENTER_ORDER};
use crate::domain::{Board, Seat};

/// Points per piece in a run of two or more through the landing cell.
const RUN_WEIGHT: i32 = 10;

pub struct HeuristicOpponent {
    mistake_rate: f64,
    rng: Mutex<StdRng>,
}

impl HeuristicOpponent {
    pub const NAME: &'static str = "Heuristic";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(config: &AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            mistake_rate: config.effective_mistake_rate(),
            rng: Mutex::new(rng),
        }
    }

    /// Pick a column for `seat`, or `None` when the board is full.
    pub fn decide(&self, board: &Board, seat: Seat) -> Option<usize> {
        let available = board.available_columns();
        if available.is_empty() {
            return None;
        }

        if !self.roll_mistake() {
            let chosen = Self::winning_column(board, &available, seat)
                .or_else(|| Self::winning_column(board, &available, seat.other()))
                .or_else(|| Self::best_setup(board, &available, seat))
                .or_else(|| Self::center_preference(&available));
            if chosen.is_some() {
                return chosen;
            }
        }

        self.random_column(&available)
    }

    fn roll_mistake(&self) -> bool {
        if self.mistake_rate <= 0.0 {
            return false;
        }
        self.rng.lock().random_bool(self.mistake_rate)
    }

    fn random_column(&self, available: &[usize]) -> Option<usize> {
        available.choose(&mut *self.rng.lock()).copied()
    }

    /// First column in `available` where dropping for `seat` wins.
    pub fn winning_column(board: &Board, available: &[usize], seat: Seat) -> Option<usize> {
        available.iter().copied().find(|&col| {
            let mut sim = board.clone();
            match sim.drop_piece(col, seat) {
                Ok(row) => sim.is_winning_cell(row, col, seat),
                Err(_) => false,
            }
        })
    }

    /// Score of dropping `seat` into `col`, or `None` if the column is closed.
    pub fn score_move(board: &Board, col: usize, seat: Seat) -> Option<i32> {
        let mut sim = board.clone();
        let row = sim.drop_piece(col, seat).ok()?;
        Some(Self::evaluate(&sim, row, col, seat))
    }

    fn evaluate(board: &Board, row: usize, col: usize, seat: Seat) -> i32 {
        let runs: i32 = AXES
            .iter()
            .map(|&axis| board.run_length(row, col, axis, seat))
            .filter(|&len| len >= 2)
            .map(|len| RUN_WEIGHT * len as i32)
            .sum();
        runs + centrality_bonus(col)
    }

    fn best_setup(board: &Board, available: &[usize], seat: Seat) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for &col in available {
            let Some(score) = Self::score_move(board, col, seat) else {
                continue;
            };
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((col, score));
            }
        }
        best.map(|(col, _)| col)
    }

    fn center_preference(available: &[usize]) -> Option<usize> {
        CENTER_ORDER
            .iter()
            .copied()
            .find(|col| available.contains(col))
    }
}

impl AiPlayer for HeuristicOpponent {
    fn choose_column(&self, board: &Board, seat: Seat) -> Result<usize, AiError> {
        self.decide(board, seat).ok_or(AiError::NoLegalMove)
    }
}
