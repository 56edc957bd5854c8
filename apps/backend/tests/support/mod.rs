pub mod app_builder;
pub mod logging;
pub mod websocket;
pub mod websocket_client;

pub use app_builder::{build_test_state, create_test_app, test_config};
