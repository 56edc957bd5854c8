//! How to register an opponent
//!
//! 1) Implement `AiPlayer` for your type in its module.
//! 2) Add a new `AiFactory` entry to the static list with stable `name` and `version`.
//! 3) Keep ordering stable; avoid side effects in constructors.
//! 4) Determinism: same seed and zero mistake rate ⇒ same behavior.

use crate::ai::{AiConfig, AiPlayer, HeuristicOpponent, RandomPlayer};

/// Factory definition for constructing opponent implementations.
pub struct AiFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(config: &AiConfig) -> Box<dyn AiPlayer>,
}

static AI_FACTORIES: &[AiFactory] = &[
    AiFactory {
        name: HeuristicOpponent::NAME,
        version: HeuristicOpponent::VERSION,
        make: make_heuristic,
    },
    AiFactory {
        name: RandomPlayer::NAME,
        version: RandomPlayer::VERSION,
        make: make_random_player,
    },
];

/// Returns the statically registered opponent factories.
pub fn registered_ais() -> &'static [AiFactory] {
    AI_FACTORIES
}

/// Finds a registered factory by its name.
pub fn by_name(name: &str) -> Option<&'static AiFactory> {
    registered_ais().iter().find(|factory| factory.name == name)
}

fn make_heuristic(config: &AiConfig) -> Box<dyn AiPlayer> {
    Box::new(HeuristicOpponent::new(config))
}

fn make_random_player(config: &AiConfig) -> Box<dyn AiPlayer> {
    Box::new(RandomPlayer::from_config(config))
}
