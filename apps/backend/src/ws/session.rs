use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::PlayerId;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::services::SessionCoordinator;
use crate::state::app_state::AppState;
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);
pub const MAX_USERNAME_LEN: usize = 32;

#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: Option<String>,
}

/// Normalise the `username` query parameter: trimmed, non-empty and at
/// most [`MAX_USERNAME_LEN`] characters.
pub fn validate_username(raw: Option<&str>) -> Result<String, AppError> {
    let username = raw.map(str::trim).unwrap_or_default();
    if username.is_empty() {
        return Err(AppError::bad_request(
            ErrorCode::InvalidUsername,
            "username query parameter is required",
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::bad_request(
            ErrorCode::InvalidUsername,
            format!("username must be at most {MAX_USERNAME_LEN} characters"),
        ));
    }
    Ok(username.to_string())
}

/// `GET /ws?username=<name>`: register the connection, then hand the socket
/// to a [`WsSession`].
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<ConnectQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let username = validate_username(query.username.as_deref())?;
    let player_id = Uuid::new_v4();
    let coordinator = app_state.coordinator.clone();

    let (tx, rx) = mpsc::channel(app_state.config.outbound_buffer);
    coordinator.connect(player_id, &username, tx).await;

    let session = WsSession::new(player_id, username, coordinator.clone(), rx);
    let response = ws::start(session, &req, stream);
    if response.is_err() {
        coordinator.disconnect(player_id).await;
    }
    response
}

pub struct WsSession {
    player_id: PlayerId,
    username: String,
    coordinator: Arc<SessionCoordinator>,
    outbound: Option<mpsc::Receiver<ServerMsg>>,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl WsSession {
    fn new(
        player_id: PlayerId,
        username: String,
        coordinator: Arc<SessionCoordinator>,
        outbound: mpsc::Receiver<ServerMsg>,
    ) -> Self {
        Self {
            player_id,
            username,
            coordinator,
            outbound: Some(outbound),
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    player_id = %actor.player_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    /// Run one client command to completion before reading the next, so a
    /// connection's moves are applied in the order it sent them.
    fn dispatch(&self, msg: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        let coordinator = self.coordinator.clone();
        let player_id = self.player_id;
        ctx.wait(async move { coordinator.handle(player_id, msg).await }.into_actor(self));
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            player_id = %self.player_id,
            username = %self.username,
            "[WS SESSION] started"
        );

        if let Some(rx) = self.outbound.take() {
            ctx.add_stream(ReceiverStream::new(rx));
        }
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        let coordinator = self.coordinator.clone();
        let player_id = self.player_id;
        actix_web::rt::spawn(async move { coordinator.disconnect(player_id).await });
        info!(player_id = %self.player_id, "[WS SESSION] stopped");
    }
}

/// Outbound traffic queued by the hub.
impl StreamHandler<ServerMsg> for WsSession {
    fn handle(&mut self, msg: ServerMsg, ctx: &mut Self::Context) {
        Self::send_json(ctx, &msg);
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        // The hub closed our queue: unregistered, replaced or evicted.
        debug!(player_id = %self.player_id, "[WS SESSION] outbound queue closed");
        if let Some(handle) = self.heartbeat_handle.take() {
            ctx.cancel_future(handle);
        }
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
        ctx.stop();
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => self.dispatch(cmd, ctx),
                    Err(err) => warn!(
                        player_id = %self.player_id,
                        error = %err,
                        "[WS SESSION] ignoring malformed message"
                    ),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                warn!(player_id = %self.player_id, "[WS SESSION] ignoring binary frame");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    player_id = %self.player_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
