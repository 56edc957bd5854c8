//! Opponent calibration.

use serde::{Deserialize, Serialize};

/// Standard configuration for computer opponents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Optional RNG seed for reproducible decisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Probability of ignoring every heuristic and playing a random open
    /// column, which keeps the opponent beatable. Clamped to `0.0..=1.0`.
    #[serde(default = "AiConfig::default_mistake_rate")]
    pub mistake_rate: f64,
}

impl AiConfig {
    pub const DEFAULT_MISTAKE_RATE: f64 = 0.1;

    fn default_mistake_rate() -> f64 {
        Self::DEFAULT_MISTAKE_RATE
    }

    /// Never plays a deliberate mistake; with a seed, fully reproducible.
    pub fn strict(seed: Option<u64>) -> Self {
        Self {
            seed,
            mistake_rate: 0.0,
        }
    }

    pub fn with_mistake_rate(mut self, rate: f64) -> Self {
        self.mistake_rate = rate;
        self
    }

    /// Mistake rate constrained to a valid probability.
    pub fn effective_mistake_rate(&self) -> f64 {
        if self.mistake_rate.is_nan() {
            return 0.0;
        }
        self.mistake_rate.clamp(0.0, 1.0)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            seed: None,
            mistake_rate: Self::DEFAULT_MISTAKE_RATE,
        }
    }
}
