//! Connection gateway: the set of connected controllers.
//!
//! The gateway is transport-agnostic.  The WebSocket layer registers each
//! accepted session with [`Gateway::on_connect`] and receives an outbound
//! queue; it feeds every inbound frame to [`Gateway::on_message`] and calls
//! [`Gateway::on_disconnect`] when the socket goes away.
//!
//! # Membership rules
//!
//! - A connection is in the active set from `on_connect` until either its
//!   session ends or the supervisor clears the set during cleanup.
//! - Removal is idempotent: the second removal of an id is a no-op and does
//!   not re-broadcast.
//! - Every membership change broadcasts `status{connectedClients}` to every
//!   client whose outbound queue is still open.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use remote_core::{is_heartbeat, parse_frame, HostMessage};
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::dispatcher::InputDispatcher;
use crate::application::selector::DispatchOutcome;

/// Identifier of one controller session.
pub type ConnectionId = Uuid;

/// Something the session task should write to its socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A JSON text frame.
    Frame(String),
    /// Close the socket and end the session.
    Close,
}

/// What the gateway did with one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameDisposition {
    /// The frame was invalid; an `error` frame was sent back.
    Rejected(String),
    /// A heartbeat; `heartbeat_ack` was sent back.
    HeartbeatAcked,
    /// Forwarded to the dispatcher.
    Dispatched(DispatchOutcome),
}

/// Body of the HTTP status side channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub message: &'static str,
    pub clients: usize,
}

/// One controller's session handle.
#[derive(Debug)]
struct ClientConnection {
    peer: SocketAddr,
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ClientConnection {
    fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    fn send(&self, message: &HostMessage) {
        match message.to_frame() {
            Ok(frame) => {
                // A closed queue means the session is already ending.
                let _ = self.sender.send(Outbound::Frame(frame));
            }
            Err(e) => warn!(peer = %self.peer, "failed to encode host message: {e}"),
        }
    }
}

/// Active-client set plus the dispatcher frames are forwarded to.
pub struct Gateway {
    clients: Mutex<HashMap<ConnectionId, ClientConnection>>,
    dispatcher: Arc<InputDispatcher>,
}

impl Gateway {
    pub fn new(dispatcher: Arc<InputDispatcher>) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            dispatcher,
        }
    }

    /// Registers a new controller, greets it and broadcasts the new count.
    ///
    /// The returned receiver is the session's outbound queue.
    pub async fn on_connect(
        &self,
        peer: SocketAddr,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<Outbound>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        let client = ClientConnection { peer, sender };
        client.send(&HostMessage::welcome_now());

        let mut clients = self.clients.lock().await;
        clients.insert(id, client);
        info!(%id, %peer, clients = clients.len(), "controller connected");
        broadcast_status(&clients);
        (id, receiver)
    }

    /// Handles one raw inbound frame from `id`.
    ///
    /// Invalid frames and heartbeats are answered directly; everything else
    /// goes to the dispatcher.  Nothing here removes the client.
    pub async fn on_message(&self, id: ConnectionId, raw: &[u8]) -> FrameDisposition {
        let event = match parse_frame(raw) {
            Ok(event) => event,
            Err(invalid) => {
                debug!(%id, reason = %invalid.reason, "rejecting invalid frame");
                self.send_to(
                    id,
                    &HostMessage::Error {
                        message: invalid.reason.clone(),
                    },
                )
                .await;
                return FrameDisposition::Rejected(invalid.reason);
            }
        };

        if is_heartbeat(&event) {
            self.send_to(id, &HostMessage::heartbeat_ack_now()).await;
            return FrameDisposition::HeartbeatAcked;
        }

        debug!(%id, kind = event.kind_name(), "dispatching frame");
        FrameDisposition::Dispatched(self.dispatcher.handle(event).await)
    }

    /// Removes `id` and broadcasts the new count.  Returns `false` if the
    /// client was already gone.
    pub async fn on_disconnect(&self, id: ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        let Some(client) = clients.remove(&id) else {
            return false;
        };
        info!(%id, peer = %client.peer, clients = clients.len(), "controller disconnected");
        broadcast_status(&clients);
        true
    }

    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Asks every session to close its socket.
    pub async fn close_all(&self) {
        let clients = self.clients.lock().await;
        for client in clients.values() {
            let _ = client.sender.send(Outbound::Close);
        }
    }

    /// Empties the active set without broadcasting.
    pub async fn clear(&self) {
        self.clients.lock().await.clear();
    }

    pub async fn status_report(&self) -> StatusReport {
        StatusReport {
            status: "ok",
            message: "Remote control host WebSocket server",
            clients: self.client_count().await,
        }
    }

    async fn send_to(&self, id: ConnectionId, message: &HostMessage) {
        if let Some(client) = self.clients.lock().await.get(&id) {
            client.send(message);
        }
    }
}

fn broadcast_status(clients: &HashMap<ConnectionId, ClientConnection>) {
    let status = HostMessage::Status {
        connected_clients: clients.len(),
    };
    for client in clients.values().filter(|c| c.is_open()) {
        client.send(&status);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
