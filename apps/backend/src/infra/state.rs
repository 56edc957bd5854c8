use std::sync::Arc;

use tracing::info;

use crate::ai::{registry, AiPlayer};
use crate::config::server::ServerConfig;
use crate::error::AppError;
use crate::infra::events::{EventSink, TracingEventSink};
use crate::repos::{GameStore, InMemoryGameStore};
use crate::services::{CoordinatorSettings, SessionCoordinator, SessionRegistry};
use crate::state::app_state::AppState;
use crate::ws::hub::Hub;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: ServerConfig,
    store: Option<Arc<dyn GameStore>>,
    events: Option<Arc<dyn EventSink>>,
    bot: Option<Arc<dyn AiPlayer>>,
    start_sweeper: bool,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            store: None,
            events: None,
            bot: None,
            start_sweeper: true,
        }
    }
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }
    pub fn with_store(mut self, store: Arc<dyn GameStore>) -> Self {
        self.store = Some(store);
        self
    }
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }
    pub fn with_bot(mut self, bot: Arc<dyn AiPlayer>) -> Self {
        self.bot = Some(bot);
        self
    }
    pub fn without_sweeper(mut self) -> Self {
        self.start_sweeper = false;
        self
    }

    /// Wire the hub, registries and coordinator. Must run inside a tokio
    /// runtime: the hub and the idle sweeper are spawned here.
    pub async fn build(self) -> Result<AppState, AppError> {
        let bot = match self.bot {
            Some(bot) => bot,
            None => {
                let factory = registry::by_name(&self.config.bot_ai).ok_or_else(|| {
                    AppError::config(format!("unknown bot opponent {}", self.config.bot_ai))
                })?;
                info!(
                    ai = factory.name,
                    version = factory.version,
                    mistake_rate = self.config.ai.effective_mistake_rate(),
                    "Bot opponent selected"
                );
                Arc::from((factory.make)(&self.config.ai))
            }
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryGameStore::new()) as Arc<dyn GameStore>);
        let events = self
            .events
            .unwrap_or_else(|| Arc::new(TracingEventSink) as Arc<dyn EventSink>);

        let coordinator = SessionCoordinator::new(
            Hub::spawn(),
            Arc::new(SessionRegistry::new()),
            store.clone(),
            events,
            bot,
            CoordinatorSettings::from(&self.config),
        );
        if self.start_sweeper {
            coordinator.spawn_idle_sweeper();
        }

        Ok(AppState::new(self.config, coordinator, store))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
