#![cfg(test)]

//! One-time tracing setup for unit tests, installed by the ctor in `lib.rs`.
//!
//! `TEST_LOG` wins over `RUST_LOG`; with neither set only warnings show.
//! `TEST_LOG=games` is shorthand for following matchmaking, moves and the
//! published game events:
//!
//! ```bash
//! TEST_LOG=games cargo test -p fourrow services::tests_coordinator
//! TEST_LOG=fourrow::ws=trace cargo test -p fourrow ws::hub
//! ```

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "warn";
const GAMES_FILTER: &str = "warn,fourrow::services=debug,fourrow::ws=debug,game_events=info";

/// Filter directives for the given `TEST_LOG` and `RUST_LOG` values.
fn directives(test_log: Option<String>, rust_log: Option<String>) -> String {
    let chosen = test_log
        .filter(|v| !v.trim().is_empty())
        .or(rust_log.filter(|v| !v.trim().is_empty()));
    match chosen.as_deref().map(str::trim) {
        Some("games") => GAMES_FILTER.to_string(),
        Some(other) => other.to_string(),
        None => DEFAULT_FILTER.to_string(),
    }
}

/// Install the test subscriber once; later calls are no-ops.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let wanted = directives(std::env::var("TEST_LOG").ok(), std::env::var("RUST_LOG").ok());
        let filter = EnvFilter::try_new(&wanted).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_takes_precedence() {
        assert_eq!(
            directives(Some("debug".into()), Some("info".into())),
            "debug"
        );
        assert_eq!(directives(Some("  ".into()), Some("info".into())), "info");
        assert_eq!(directives(None, None), DEFAULT_FILTER);
    }

    #[test]
    fn games_shorthand_expands() {
        assert_eq!(directives(Some("games".into()), None), GAMES_FILTER);
        assert!(EnvFilter::try_new(GAMES_FILTER).is_ok());
    }
}
