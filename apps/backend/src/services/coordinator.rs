//! Game orchestration across the hub, the matchmaker and live sessions.
//!
//! Session mutation always happens under that session's mutex with no
//! `.await` in between: seat resolution, the turn check and the move are one
//! critical section. Notifications, persistence and analytics run after the
//! lock is released.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::ai::AiPlayer;
use crate::config::server::ServerConfig;
use crate::domain::{
    AppliedMove, GameId, GameSession, GameSnapshot, GameStatus, MoveError, MoveOutcome, Player,
    PlayerId, Seat, COLS,
};
use crate::infra::events::{EventSink, GameEvent, GameEventType};
use crate::repos::GameStore;
use crate::services::matchmaking::{MatchReceiver, Matchmaker};
use crate::services::sessions::{SessionRegistry, SharedSession};
use crate::ws::hub::{ConnectionHandle, Hub};
use crate::ws::protocol::{ClientMsg, GameResult, ServerMsg};

pub const ALREADY_IN_GAME: &str = "Already in a game";
pub const GAME_NOT_FOUND: &str = "Game not found";
pub const NO_ACTIVE_GAME: &str = "No active game";
pub const GAME_ABANDONED: &str = "Game abandoned";

/// Timing knobs for the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorSettings {
    pub match_timeout: Duration,
    pub bot_move_delay: Duration,
    pub bot_think_delay: Duration,
    pub idle_game_timeout: Duration,
    pub idle_sweep_interval: Duration,
}

impl From<&ServerConfig> for CoordinatorSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            match_timeout: config.match_timeout,
            bot_move_delay: config.bot_move_delay,
            bot_think_delay: config.bot_think_delay,
            idle_game_timeout: config.idle_game_timeout,
            idle_sweep_interval: config.idle_sweep_interval,
        }
    }
}

pub struct SessionCoordinator {
    hub: Hub,
    sessions: Arc<SessionRegistry>,
    matchmaker: Matchmaker,
    store: Arc<dyn GameStore>,
    events: Arc<dyn EventSink>,
    bot: Arc<dyn AiPlayer>,
    settings: CoordinatorSettings,
}

impl SessionCoordinator {
    pub fn new(
        hub: Hub,
        sessions: Arc<SessionRegistry>,
        store: Arc<dyn GameStore>,
        events: Arc<dyn EventSink>,
        bot: Arc<dyn AiPlayer>,
        settings: CoordinatorSettings,
    ) -> Arc<Self> {
        Arc::new(Self {
            hub,
            matchmaker: Matchmaker::new(Arc::clone(&sessions)),
            sessions,
            store,
            events,
            bot,
            settings,
        })
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn matchmaker(&self) -> &Matchmaker {
        &self.matchmaker
    }

    /// Register a new connection and make sure the player has a tally row.
    pub async fn connect(
        &self,
        player_id: PlayerId,
        username: &str,
        sender: mpsc::Sender<ServerMsg>,
    ) {
        self.hub
            .register(ConnectionHandle {
                player_id,
                username: username.to_string(),
                sender,
            })
            .await;
        if let Err(err) = self.store.ensure_player(username).await {
            warn!(player_id = %player_id, error = %err, "Failed to record player");
        }
    }

    /// Cancel any pending matchmaking and drop the connection. An in-progress
    /// game is left alone; the player may rejoin it.
    pub async fn disconnect(&self, player_id: PlayerId) {
        if self.matchmaker.cancel(player_id) {
            debug!(player_id = %player_id, "Cancelled matchmaking on disconnect");
        }
        self.hub.unregister(player_id).await;
    }

    pub async fn handle(self: &Arc<Self>, player_id: PlayerId, msg: ClientMsg) {
        match msg {
            ClientMsg::FindMatch => self.find_match(player_id).await,
            ClientMsg::MakeMove { column } => self.make_move(player_id, column).await,
            ClientMsg::Rejoin { game_id } => self.rejoin(player_id, &game_id).await,
        }
    }

    /// Queue the player and pair them now if possible; otherwise wait in the
    /// background until paired or the timeout hands them a bot.
    pub async fn find_match(self: &Arc<Self>, player_id: PlayerId) {
        let Some(conn) = self.hub.get(player_id).await else {
            debug!(player_id = %player_id, "find_match from unknown connection");
            return;
        };
        if conn
            .game_id
            .is_some_and(|id| self.sessions.holds_live_seat(id, player_id))
        {
            self.hub.send_to(player_id, ServerMsg::error(ALREADY_IN_GAME)).await;
            return;
        }

        let player = Player::human(player_id, conn.username, Seat::One);
        let rx = self.matchmaker.enqueue(player.clone());

        if let Some((session, _opponent)) = self.matchmaker.try_pair_with(player_id) {
            self.start_game(&session).await;
            return;
        }

        let this = Arc::clone(self);
        tokio::spawn(async move { this.await_match(player, rx).await });
    }

    async fn await_match(self: Arc<Self>, player: Player, mut rx: MatchReceiver) {
        tokio::select! {
            notified = &mut rx => {
                // The pairing side announces the game to both seats.
                if notified.is_err() {
                    debug!(player_id = %player.id, "Matchmaking wait superseded");
                }
            }
            _ = tokio::time::sleep(self.settings.match_timeout) => {
                if self.matchmaker.cancel(player.id) {
                    info!(player_id = %player.id, "No opponent found; starting bot game");
                    self.start_bot_game(player).await;
                } else {
                    // A pairing claimed the entry just before the timeout fired.
                    let _ = rx.await;
                }
            }
        }
    }

    pub async fn start_bot_game(self: &Arc<Self>, player: Player) {
        let session = GameSession::paired(player.seated(Seat::One), Player::bot(Seat::Two));
        let shared = self.sessions.insert(session);
        self.start_game(&shared).await;
    }

    async fn start_game(self: &Arc<Self>, session: &SharedSession) {
        let snapshot = session.lock().snapshot();
        let humans = snapshot.human_ids();
        for &id in &humans {
            self.hub.set_game(id, Some(snapshot.id)).await;
        }

        info!(
            game_id = %snapshot.id,
            player1 = %snapshot.player1.username,
            player2 = snapshot.player2.as_ref().map(|p| p.username.as_str()).unwrap_or(""),
            is_bot = snapshot.is_bot,
            "Game started"
        );

        self.hub
            .send_many(&humans, &ServerMsg::GameStart {
                game: snapshot.clone(),
            })
            .await;
        self.publish(GameEventType::GameStart, snapshot.id, json!(snapshot))
            .await;
        self.schedule_bot_if_due(session, &snapshot);
    }

    /// Apply a move for the caller's own seat in the game their connection
    /// is attached to. Rule violations go back to the caller only.
    pub async fn make_move(self: &Arc<Self>, player_id: PlayerId, column: i64) {
        let Some(game_id) = self.hub.get(player_id).await.and_then(|c| c.game_id) else {
            self.hub.send_to(player_id, ServerMsg::error(NO_ACTIVE_GAME)).await;
            return;
        };
        let Some(session) = self.sessions.get(game_id) else {
            self.hub.send_to(player_id, ServerMsg::error(GAME_NOT_FOUND)).await;
            return;
        };

        let result = {
            let mut s = session.lock();
            apply_for_player(&mut s, player_id, column).map(|applied| (applied, s.snapshot()))
        };

        match result {
            Ok((applied, snapshot)) => self.after_move(&session, applied, snapshot).await,
            Err(err) => {
                debug!(
                    game_id = %game_id,
                    player_id = %player_id,
                    column,
                    code = err.code(),
                    "Move rejected"
                );
                self.hub.send_to(player_id, ServerMsg::error(err.to_string())).await;
            }
        }
    }

    async fn after_move(
        self: &Arc<Self>,
        session: &SharedSession,
        applied: AppliedMove,
        snapshot: GameSnapshot,
    ) {
        let humans = snapshot.human_ids();
        debug!(
            game_id = %snapshot.id,
            seat = %applied.seat,
            column = applied.column,
            row = applied.row,
            "Move applied"
        );

        self.hub
            .send_many(&humans, &ServerMsg::MoveMade {
                column: applied.column,
                row: applied.row,
                player: applied.seat,
                game: snapshot.clone(),
            })
            .await;
        self.publish(
            GameEventType::MoveMade,
            snapshot.id,
            json!({ "column": applied.column, "row": applied.row, "player": applied.seat }),
        )
        .await;

        match applied.outcome {
            MoveOutcome::Continue => self.schedule_bot_if_due(session, &snapshot),
            MoveOutcome::Win => self.finish_game(snapshot, GameResult::Win).await,
            MoveOutcome::Draw => self.finish_game(snapshot, GameResult::Draw).await,
        }
    }

    async fn finish_game(&self, snapshot: GameSnapshot, result: GameResult) {
        let humans = snapshot.human_ids();
        info!(
            game_id = %snapshot.id,
            result = ?result,
            winner = snapshot.winner.as_ref().map(|w| w.username.as_str()).unwrap_or(""),
            "Game finished"
        );

        if let Err(err) = self.store.record_finished_game(&snapshot).await {
            warn!(game_id = %snapshot.id, error = %err, "Failed to archive finished game");
        }
        if let Err(err) = self.store.record_outcome(&snapshot).await {
            warn!(game_id = %snapshot.id, error = %err, "Failed to record game outcome");
        }

        self.hub
            .send_many(&humans, &ServerMsg::GameEnd {
                result,
                winner: snapshot.winner.clone(),
                game: snapshot.clone(),
            })
            .await;
        self.publish(
            GameEventType::GameEnd,
            snapshot.id,
            json!({ "result": result, "winner": snapshot.winner }),
        )
        .await;

        self.sessions.remove(snapshot.id);
    }

    fn schedule_bot_if_due(self: &Arc<Self>, session: &SharedSession, snapshot: &GameSnapshot) {
        let bot_turn = snapshot.status == GameStatus::Playing
            && snapshot
                .players()
                .any(|p| p.is_bot() && p.seat == snapshot.current_turn);
        if !bot_turn {
            return;
        }
        let this = Arc::clone(self);
        let session = Arc::clone(session);
        let game_id = snapshot.id;
        tokio::spawn(async move { this.play_bot_turn(game_id, session).await });
    }

    async fn play_bot_turn(self: Arc<Self>, game_id: GameId, session: SharedSession) {
        tokio::time::sleep(self.settings.bot_move_delay + self.settings.bot_think_delay).await;

        // Swept or finished while the bot was thinking.
        if self.sessions.get(game_id).is_none() {
            return;
        }

        let result = {
            let mut s = session.lock();
            let Some(seat) = s.bot_seat() else {
                return;
            };
            if s.status() != GameStatus::Playing || s.current_turn() != seat {
                return;
            }
            match self.bot.choose_column(s.board(), seat) {
                Ok(column) => s.apply_move(column, seat).map(|applied| (applied, s.snapshot())),
                Err(err) => {
                    warn!(game_id = %game_id, error = %err, "Bot could not choose a move");
                    return;
                }
            }
        };

        match result {
            Ok((applied, snapshot)) => self.after_move(&session, applied, snapshot).await,
            Err(err) => warn!(game_id = %game_id, error = %err, "Bot chose an illegal move"),
        }
    }

    /// Send the caller the current state of the game named by `raw_id` and
    /// attach their connection to it as a viewer. Seats are never rebound;
    /// a viewer's moves are refused.
    pub async fn rejoin(&self, player_id: PlayerId, raw_id: &str) {
        let session = raw_id
            .trim()
            .parse::<GameId>()
            .ok()
            .and_then(|id| self.sessions.get(id));
        let Some(session) = session else {
            debug!(player_id = %player_id, game_id = raw_id, "Rejoin for unknown game");
            self.hub.send_to(player_id, ServerMsg::error(GAME_NOT_FOUND)).await;
            return;
        };

        let (game_id, seat) = {
            let s = session.lock();
            (s.id(), s.seat_of(player_id))
        };
        debug!(
            game_id = %game_id,
            player_id = %player_id,
            seated = seat.is_some(),
            "Rejoined game"
        );

        self.hub.set_game(player_id, Some(game_id)).await;
        let snapshot = session.lock().snapshot();
        self.hub
            .send_to(player_id, ServerMsg::RejoinSuccess { game: snapshot })
            .await;
    }

    /// Remove unfinished games idle past the configured timeout and tell
    /// anyone still connected. Abandoned games are not recorded.
    pub async fn sweep_idle(&self) -> usize {
        let removed = self
            .sessions
            .remove_idle(self.settings.idle_game_timeout, Instant::now());
        for session in &removed {
            let (snapshot, moves) = {
                let s = session.lock();
                (s.snapshot(), s.board().piece_count())
            };
            info!(game_id = %snapshot.id, moves, "Abandoning idle game");
            let humans = snapshot.human_ids();
            self.hub
                .send_many(&humans, &ServerMsg::error(GAME_ABANDONED))
                .await;
            self.publish(
                GameEventType::GameAbandoned,
                snapshot.id,
                json!({ "moves": moves }),
            )
            .await;
        }
        removed.len()
    }

    pub fn spawn_idle_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(this.settings.idle_sweep_interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let swept = this.sweep_idle().await;
                if swept > 0 {
                    info!(swept, remaining = this.sessions.len(), "Idle sweep complete");
                }
            }
        })
    }

    async fn publish(&self, event_type: GameEventType, game_id: GameId, payload: serde_json::Value) {
        let event = GameEvent::new(event_type, game_id, payload);
        if let Err(err) = self.events.publish(event).await {
            warn!(
                game_id = %game_id,
                event_type = event_type.as_str(),
                error = %err,
                "Failed to publish game event"
            );
        }
    }
}

fn apply_for_player(
    session: &mut GameSession,
    player_id: PlayerId,
    column: i64,
) -> Result<AppliedMove, MoveError> {
    let seat = session
        .seat_of(player_id)
        .ok_or(MoveError::NotAParticipant)?;
    let column = usize::try_from(column)
        .ok()
        .filter(|c| *c < COLS)
        .ok_or(MoveError::InvalidColumn(column))?;
    session.apply_move(column, seat)
}
