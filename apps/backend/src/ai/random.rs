//! Random opponent: plays a uniformly random open column.
//!
//! Useful as a baseline and in tests that need an opponent which never
//! blocks or completes lines on purpose.

use parking_lot::Mutex;
use rand::prelude::*;

use super::config::AiConfig;
use super::trait_def::{AiError, AiPlayer};
use crate::domain::{Board, Seat};

pub struct RandomPlayer {
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = if let Some(s) = seed {
            StdRng::seed_from_u64(s)
        } else {
            StdRng::from_os_rng()
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(config.seed)
    }
}

impl AiPlayer for RandomPlayer {
    fn choose_column(&self, board: &Board, _seat: Seat) -> Result<usize, AiError> {
        let available = board.available_columns();
        let mut rng = self.rng.lock();
        available.choose(&mut *rng).copied().ok_or(AiError::NoLegalMove)
    }
}
