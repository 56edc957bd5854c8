use std::sync::Arc;

use crate::config::server::ServerConfig;
use crate::repos::GameStore;
use crate::services::SessionCoordinator;

/// Application state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub coordinator: Arc<SessionCoordinator>,
    /// Persistence collaborator, also read by the leaderboard route.
    pub store: Arc<dyn GameStore>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        coordinator: Arc<SessionCoordinator>,
        store: Arc<dyn GameStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            coordinator,
            store,
        }
    }
}
