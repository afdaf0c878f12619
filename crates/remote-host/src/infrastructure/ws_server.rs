//! WebSocket transport: TCP listener, per-controller sessions and the HTTP
//! status side channel.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address (port `0` picks an
//!    ephemeral port).
//! 2. Accepting connections until the supervisor stops the listener.
//! 3. Peeking at each request head: WebSocket upgrades become controller
//!    sessions, anything else gets the JSON status document and is closed.
//! 4. Running each session in its own task, feeding frames to the
//!    [`Gateway`] and writing its outbound queue to the socket.
//!
//! # Fault reporting
//!
//! Transient accept errors (a peer resetting mid-handshake) are logged and
//! the loop continues.  Any other accept error, an accept loop that ends
//! without being stopped, or a panic in a frame handler is reported through
//! the generation's [`FaultReporter`] so the supervisor can restart.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};

use crate::application::gateway::{Gateway, Outbound};
use crate::application::supervisor::{
    ActiveListener, FaultReporter, Transport, TransportError,
};

/// Largest request head accepted.  Browsers send cookie blocks of several
/// kilobytes ahead of the `Upgrade` header.
const MAX_HEAD: usize = 16 * 1024;

/// How long a client may take to send its request head.
const HEAD_TIMEOUT: Duration = Duration::from_secs(5);

// ── Transport ─────────────────────────────────────────────────────────────────

/// Binds WebSocket listeners on a fixed address.
pub struct WebSocketTransport {
    bind_addr: SocketAddr,
}

impl WebSocketTransport {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn bind(
        &self,
        gateway: Arc<Gateway>,
        faults: FaultReporter,
    ) -> Result<Box<dyn ActiveListener>, TransportError> {
        let listener =
            TcpListener::bind(self.bind_addr)
                .await
                .map_err(|source| TransportError::Bind {
                    addr: self.bind_addr,
                    source,
                })?;
        let local_addr = listener.local_addr()?;

        let (stop_tx, stop_rx) = oneshot::channel();
        let accept = tokio::spawn(accept_loop(listener, gateway, faults.clone(), stop_rx));
        let watcher = tokio::spawn(watch_accept_loop(accept, faults));

        Ok(Box::new(WebSocketListener {
            local_addr,
            stop: Some(stop_tx),
            watcher: Some(watcher),
        }))
    }
}

/// A running accept loop.
pub struct WebSocketListener {
    local_addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    watcher: Option<JoinHandle<()>>,
}

#[async_trait]
impl ActiveListener for WebSocketListener {
    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting and waits until the listening socket is closed.
    async fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(watcher) = self.watcher.take() {
            let _ = watcher.await;
        }
        debug!(addr = %self.local_addr, "listener stopped");
    }
}

// ── Accept loop ───────────────────────────────────────────────────────────────

async fn accept_loop(
    listener: TcpListener,
    gateway: Arc<Gateway>,
    faults: FaultReporter,
    mut stop: oneshot::Receiver<()>,
) -> Result<(), TransportError> {
    loop {
        tokio::select! {
            // A dropped sender counts as a stop request too.
            _ = &mut stop => return Ok(()),
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let gateway = Arc::clone(&gateway);
                    let faults = faults.clone();
                    tokio::spawn(async move {
                        handle_connection(stream, peer, gateway, faults).await;
                    });
                }
                Err(e) if is_transient_accept_error(&e) => {
                    warn!("transient accept error: {e}");
                }
                Err(e) => return Err(TransportError::Listener(e)),
            },
        }
    }
}

async fn watch_accept_loop(
    accept: JoinHandle<Result<(), TransportError>>,
    faults: FaultReporter,
) {
    match accept.await {
        Ok(Ok(())) => debug!(generation = faults.generation(), "accept loop stopped"),
        Ok(Err(e)) => {
            error!("accept loop failed: {e}");
            faults.report(e.to_string());
        }
        Err(join) if join.is_panic() => {
            error!("accept loop panicked");
            faults.report("accept loop panicked");
        }
        Err(_) => faults.report(TransportError::Closed.to_string()),
    }
}

fn is_transient_accept_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::ConnectionAborted
            | ErrorKind::ConnectionReset
            | ErrorKind::Interrupted
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}

// ── Per-connection handling ───────────────────────────────────────────────────

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    gateway: Arc<Gateway>,
    faults: FaultReporter,
) {
    let head = match tokio::time::timeout(HEAD_TIMEOUT, peek_head(&stream)).await {
        Ok(Ok(head)) => head,
        Ok(Err(e)) => {
            debug!(%peer, "failed to read request head: {e}");
            return;
        }
        Err(_) => {
            debug!(%peer, "request head timed out");
            return;
        }
    };

    match classify(&head) {
        RequestKind::Upgrade => run_session(stream, peer, gateway, faults).await,
        RequestKind::Status => {
            if let Err(e) = serve_status(stream, &gateway).await {
                debug!(%peer, "status request failed: {e}");
            }
        }
        RequestKind::Oversize => {
            warn!(%peer, "request head exceeds {MAX_HEAD} bytes, rejecting");
            if let Err(e) = reject_oversize(stream).await {
                debug!(%peer, "oversize rejection failed: {e}");
            }
        }
    }
}

/// What a connection's request head asks for.
#[derive(Debug, PartialEq, Eq)]
enum RequestKind {
    Upgrade,
    Status,
    /// No complete head within [`MAX_HEAD`] bytes.
    Oversize,
}

fn classify(head: &[u8]) -> RequestKind {
    if head.len() >= MAX_HEAD && !contains_head_end(head) {
        RequestKind::Oversize
    } else if is_websocket_upgrade(head) {
        RequestKind::Upgrade
    } else {
        RequestKind::Status
    }
}

/// Peeks (without consuming) until the end of the HTTP head, the buffer is
/// full, or the peer closes.
async fn peek_head(stream: &TcpStream) -> std::io::Result<Vec<u8>> {
    let mut buf = vec![0u8; MAX_HEAD];
    loop {
        let n = stream.peek(&mut buf).await?;
        if n == 0 || n == buf.len() || contains_head_end(&buf[..n]) {
            buf.truncate(n);
            return Ok(buf);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

fn contains_head_end(bytes: &[u8]) -> bool {
    bytes.windows(4).any(|w| w == b"\r\n\r\n")
}

/// `true` if a header line of the request head asks for a WebSocket
/// upgrade.  The request line and anything after the head are not headers.
fn is_websocket_upgrade(head: &[u8]) -> bool {
    let head = String::from_utf8_lossy(head);
    let headers = head.split("\r\n\r\n").next().unwrap_or_default();
    headers.lines().skip(1).any(|line| {
        let line = line.to_ascii_lowercase();
        line.starts_with("upgrade:") && line.contains("websocket")
    })
}

async fn reject_oversize(mut stream: TcpStream) -> std::io::Result<()> {
    stream
        .write_all(
            b"HTTP/1.1 431 Request Header Fields Too Large\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await?;
    stream.shutdown().await
}

async fn serve_status(mut stream: TcpStream, gateway: &Gateway) -> std::io::Result<()> {
    let mut sink = vec![0u8; MAX_HEAD];
    let _ = stream.read(&mut sink).await?;

    let body = serde_json::to_string(&gateway.status_report().await)
        .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Runs one controller session until either side closes it.
async fn run_session(
    stream: TcpStream,
    peer: SocketAddr,
    gateway: Arc<Gateway>,
    faults: FaultReporter,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(%peer, "WebSocket handshake failed: {e}");
            return;
        }
    };
    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let (id, mut outbound) = gateway.on_connect(peer).await;

    // Frames are handled concurrently; a panicking handler is a fatal fault.
    let mut handlers = JoinSet::new();

    loop {
        tokio::select! {
            incoming = ws_rx.next() => {
                let raw = match incoming {
                    Some(Ok(WsMessage::Text(text))) => text.into_bytes(),
                    Some(Ok(WsMessage::Binary(bytes))) => bytes,
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug!(%id, "WebSocket read error: {e}");
                        break;
                    }
                };
                let gateway = Arc::clone(&gateway);
                handlers.spawn(async move { gateway.on_message(id, &raw).await });
            }

            out = outbound.recv() => match out {
                Some(Outbound::Frame(text)) => {
                    if let Err(e) = ws_tx.send(WsMessage::Text(text)).await {
                        debug!(%id, "WebSocket send failed: {e}");
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = ws_tx.send(WsMessage::Close(None)).await;
                    break;
                }
            },

            Some(joined) = handlers.join_next() => match joined {
                Ok(disposition) => debug!(%id, ?disposition, "frame handled"),
                Err(e) if e.is_panic() => {
                    error!(%id, "frame handler panicked");
                    faults.report(format!("frame handler for {peer} panicked"));
                }
                Err(_) => {}
            },
        }
    }

    // In-flight backend calls run to completion; their results are dropped.
    handlers.detach_all();
    gateway.on_disconnect(id).await;
    info!(%id, %peer, "session ended");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
