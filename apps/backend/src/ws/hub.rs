//! Connection registry.
//!
//! One task owns the map of connected players. Every registration, removal,
//! lookup and delivery is a command on its queue, so two deliveries never
//! interleave and a disconnect racing a broadcast is seen either before or
//! after it, never half-applied.
//!
//! Delivery never waits on a client: a full outbound queue evicts the
//! connection, which closes its channel and lets the websocket actor wind
//! down through the normal disconnect path.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::{GameId, PlayerId};
use crate::ws::protocol::ServerMsg;

/// What the registry holds for a live connection. The sender is the only
/// producer side of the connection's outbound queue.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub player_id: PlayerId,
    pub username: String,
    pub sender: mpsc::Sender<ServerMsg>,
}

/// Read-only view of a registered connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub player_id: PlayerId,
    pub username: String,
    pub game_id: Option<GameId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The outbound queue was full; the connection has been removed.
    Evicted,
    /// The receiving side had already gone away; the entry has been removed.
    Closed,
    NotConnected,
}

struct Entry {
    username: String,
    sender: mpsc::Sender<ServerMsg>,
    game_id: Option<GameId>,
}

enum Command {
    Register {
        handle: ConnectionHandle,
        reply: oneshot::Sender<()>,
    },
    Unregister {
        player_id: PlayerId,
        reply: oneshot::Sender<bool>,
    },
    SendTo {
        player_id: PlayerId,
        msg: ServerMsg,
        reply: oneshot::Sender<Delivery>,
    },
    Broadcast {
        msg: ServerMsg,
        reply: oneshot::Sender<usize>,
    },
    Get {
        player_id: PlayerId,
        reply: oneshot::Sender<Option<ConnectionInfo>>,
    },
    SetGame {
        player_id: PlayerId,
        game_id: Option<GameId>,
        reply: oneshot::Sender<bool>,
    },
    Count {
        reply: oneshot::Sender<usize>,
    },
}

/// Cloneable handle to the registry task. The task stops once every handle
/// is dropped.
#[derive(Clone, Debug)]
pub struct Hub {
    tx: mpsc::UnboundedSender<Command>,
}

impl Hub {
    /// Start the registry task on the current tokio runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx));
        Self { tx }
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Option<T> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).ok()?;
        rx.await.ok()
    }

    /// Add a connection. A previous connection for the same player is closed
    /// and replaced.
    pub async fn register(&self, handle: ConnectionHandle) {
        self.request(|reply| Command::Register { handle, reply })
            .await;
    }

    /// Remove a connection and close its outbound queue. Returns false when
    /// it was already gone.
    pub async fn unregister(&self, player_id: PlayerId) -> bool {
        self.request(|reply| Command::Unregister { player_id, reply })
            .await
            .unwrap_or(false)
    }

    pub async fn send_to(&self, player_id: PlayerId, msg: ServerMsg) -> Delivery {
        self.request(|reply| Command::SendTo {
            player_id,
            msg,
            reply,
        })
        .await
        .unwrap_or(Delivery::NotConnected)
    }

    /// Deliver to several players in order.
    pub async fn send_many(&self, player_ids: &[PlayerId], msg: &ServerMsg) {
        for &player_id in player_ids {
            self.send_to(player_id, msg.clone()).await;
        }
    }

    /// Deliver to every connection; returns how many accepted the message.
    pub async fn broadcast(&self, msg: ServerMsg) -> usize {
        self.request(|reply| Command::Broadcast { msg, reply })
            .await
            .unwrap_or(0)
    }

    pub async fn get(&self, player_id: PlayerId) -> Option<ConnectionInfo> {
        self.request(|reply| Command::Get { player_id, reply })
            .await
            .flatten()
    }

    /// Record which game a connection is attached to.
    pub async fn set_game(&self, player_id: PlayerId, game_id: Option<GameId>) -> bool {
        self.request(|reply| Command::SetGame {
            player_id,
            game_id,
            reply,
        })
        .await
        .unwrap_or(false)
    }

    pub async fn connected_count(&self) -> usize {
        self.request(|reply| Command::Count { reply })
            .await
            .unwrap_or(0)
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<Command>) {
    let mut clients: HashMap<PlayerId, Entry> = HashMap::new();

    while let Some(command) = rx.recv().await {
        match command {
            Command::Register { handle, reply } => {
                let replaced = clients.insert(
                    handle.player_id,
                    Entry {
                        username: handle.username,
                        sender: handle.sender,
                        game_id: None,
                    },
                );
                if replaced.is_some() {
                    debug!(player_id = %handle.player_id, "Replaced existing connection");
                }
                info!(player_id = %handle.player_id, connected = clients.len(), "Client registered");
                let _ = reply.send(());
            }
            Command::Unregister { player_id, reply } => {
                // Dropping the entry drops the only sender, closing the queue.
                let removed = clients.remove(&player_id).is_some();
                if removed {
                    info!(player_id = %player_id, connected = clients.len(), "Client unregistered");
                }
                let _ = reply.send(removed);
            }
            Command::SendTo {
                player_id,
                msg,
                reply,
            } => {
                let outcome = deliver(&mut clients, player_id, msg);
                let _ = reply.send(outcome);
            }
            Command::Broadcast { msg, reply } => {
                let ids: Vec<PlayerId> = clients.keys().copied().collect();
                let delivered = ids
                    .into_iter()
                    .filter(|&id| deliver(&mut clients, id, msg.clone()) == Delivery::Delivered)
                    .count();
                let _ = reply.send(delivered);
            }
            Command::Get { player_id, reply } => {
                let info = clients.get(&player_id).map(|e| ConnectionInfo {
                    player_id,
                    username: e.username.clone(),
                    game_id: e.game_id,
                });
                let _ = reply.send(info);
            }
            Command::SetGame {
                player_id,
                game_id,
                reply,
            } => {
                let found = match clients.get_mut(&player_id) {
                    Some(entry) => {
                        entry.game_id = game_id;
                        true
                    }
                    None => false,
                };
                let _ = reply.send(found);
            }
            Command::Count { reply } => {
                let _ = reply.send(clients.len());
            }
        }
    }

    debug!("Connection registry stopped");
}

fn deliver(clients: &mut HashMap<PlayerId, Entry>, player_id: PlayerId, msg: ServerMsg) -> Delivery {
    let Some(entry) = clients.get(&player_id) else {
        return Delivery::NotConnected;
    };
    match entry.sender.try_send(msg) {
        Ok(()) => Delivery::Delivered,
        Err(mpsc::error::TrySendError::Full(msg)) => {
            warn!(
                player_id = %player_id,
                dropped = msg.kind(),
                "Outbound queue full; evicting slow client"
            );
            clients.remove(&player_id);
            Delivery::Evicted
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!(player_id = %player_id, "Outbound queue closed; removing client");
            clients.remove(&player_id);
            Delivery::Closed
        }
    }
}
