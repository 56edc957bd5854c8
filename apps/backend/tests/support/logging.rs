//! Logging initialization for integration tests
//!
//! Mirrors the crate's test_bootstrap module, which integration tests cannot
//! reach because it is compiled only for unit tests.
//!
//! `TEST_LOG` wins over `RUST_LOG`, defaulting to `warn`. `TEST_LOG=games`
//! follows matchmaking, moves and game events.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

pub fn init() {
    INITIALIZED.get_or_init(|| {
        let wanted = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());
        let wanted = match wanted.trim() {
            "games" => "warn,fourrow::services=debug,fourrow::ws=debug,game_events=info",
            other => other,
        };
        let filter = EnvFilter::try_new(wanted).unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Automatically initialize logging for all integration test binaries.
#[ctor::ctor]
fn _auto_init_for_integration_tests() {
    init();
}
