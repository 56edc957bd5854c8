//! Analytics event sink.
//!
//! Events are fire-and-report: a failing sink is logged by the caller and
//! never blocks or rolls back gameplay.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use time::OffsetDateTime;
use tracing::info;

use crate::domain::GameId;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEventType {
    GameStart,
    MoveMade,
    GameEnd,
    GameAbandoned,
}

impl GameEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            GameEventType::GameStart => "game_start",
            GameEventType::MoveMade => "move_made",
            GameEventType::GameEnd => "game_end",
            GameEventType::GameAbandoned => "game_abandoned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameEvent {
    pub event_type: GameEventType,
    pub game_id: GameId,
    pub payload: JsonValue,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl GameEvent {
    pub fn new(event_type: GameEventType, game_id: GameId, payload: JsonValue) -> Self {
        Self {
            event_type,
            game_id,
            payload,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: GameEvent) -> Result<(), DomainError>;
}

/// Emits each event as a structured `info` record on the `game_events` target.
#[derive(Debug, Default)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn publish(&self, event: GameEvent) -> Result<(), DomainError> {
        info!(
            target: "game_events",
            event_type = event.event_type.as_str(),
            game_id = %event.game_id,
            timestamp = %event.timestamp,
            payload = %event.payload,
            "game event"
        );
        Ok(())
    }
}

/// Keeps every published event in memory; used by tests to observe the
/// event stream.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().clone()
    }

    pub fn types_for(&self, game_id: GameId) -> Vec<GameEventType> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.game_id == game_id)
            .map(|e| e.event_type)
            .collect()
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn publish(&self, event: GameEvent) -> Result<(), DomainError> {
        self.events.lock().push(event);
        Ok(())
    }
}
