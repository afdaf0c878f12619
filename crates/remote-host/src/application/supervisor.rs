//! Lifecycle supervisor: bind, detect faults, restart within budget, shut
//! down.
//!
//! # How it works (for beginners)
//!
//! The supervisor is a single task that owns every piece of lifecycle state:
//! the [`HostState`], the [`RestartBudget`], the active listener and the
//! current [`ConnectionDescriptor`].  Nothing else mutates them, so no locks
//! are needed.
//!
//! Everything that can go wrong elsewhere (the accept loop dying, a session
//! task panicking) is reported back as a message on one channel:
//!
//! ```text
//!  accept loop ──┐
//!  session task ─┼── FaultReporter ──► SupervisorSignal::Fatal ──┐
//!                │                                               ▼
//!  Ctrl-C / TERM ─── SupervisorHandle ─► SupervisorSignal::Shutdown ─► Supervisor::run
//! ```
//!
//! # Listener generations
//!
//! Every successful start opens a new *generation*.  Each [`FaultReporter`]
//! is stamped with the generation it was created for, and faults from a
//! generation that has already been torn down are ignored.  A listener that
//! reports its own death while being stopped cannot trigger a second
//! restart.
//!
//! # Advertisement and pairing failures
//!
//! Only listener faults are fatal.  A failed discovery publish or pairing
//! code render is logged and the host keeps serving on its address, so a
//! controller that already knows the URL can still connect.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use remote_core::{ConnectionDescriptor, HostState, RestartBudget};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::gateway::Gateway;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Listener-level failure.  Always fatal to the current generation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("listener failed: {0}")]
    Listener(#[from] std::io::Error),

    #[error("listener closed unexpectedly")]
    Closed,
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("mDNS error: {0}")]
    Mdns(String),

    #[error("invalid service registration: {0}")]
    InvalidService(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode pairing payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("failed to render pairing code: {0}")]
    Encode(String),
}

// ── Collaborator seams ────────────────────────────────────────────────────────

/// Binds a listener that feeds accepted sessions into the gateway.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Binds and starts accepting.  The listener must report any later
    /// failure through `faults`.
    async fn bind(
        &self,
        gateway: Arc<Gateway>,
        faults: FaultReporter,
    ) -> Result<Box<dyn ActiveListener>, TransportError>;
}

/// A bound, accepting listener.
#[async_trait]
pub trait ActiveListener: Send + Sync {
    fn local_addr(&self) -> SocketAddr;

    /// Stops accepting.  Must not report a fault for the stop itself.
    async fn stop(&mut self);
}

/// Advertises the host on the local network.
#[async_trait]
pub trait DiscoveryPublisher: Send + Sync {
    async fn publish(&self, descriptor: &ConnectionDescriptor) -> Result<(), DiscoveryError>;

    /// Withdraws the current advertisement, if any.
    async fn unpublish(&self) -> Result<(), DiscoveryError>;

    /// Releases the publisher for good.  Called once on termination.
    async fn shutdown(&self) {}
}

/// Presents the descriptor to the user, e.g. as a QR code.
pub trait PairingCodeRenderer: Send + Sync {
    fn render(&self, descriptor: &ConnectionDescriptor) -> Result<(), RenderError>;
}

// ── Signals ───────────────────────────────────────────────────────────────────

/// A message to the supervisor task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorSignal {
    Fatal { generation: u64, reason: String },
    Shutdown { signal: String },
}

/// Reports fatal faults on behalf of one listener generation.
#[derive(Debug, Clone)]
pub struct FaultReporter {
    tx: mpsc::UnboundedSender<SupervisorSignal>,
    generation: u64,
}

impl FaultReporter {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SupervisorSignal>, generation: u64) -> Self {
        Self { tx, generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn report(&self, reason: impl Into<String>) {
        let reason = reason.into();
        if self
            .tx
            .send(SupervisorSignal::Fatal {
                generation: self.generation,
                reason,
            })
            .is_err()
        {
            debug!(generation = self.generation, "supervisor gone; dropping fault");
        }
    }
}

/// Cloneable handle for requesting shutdown from signal handlers.
#[derive(Debug, Clone)]
pub struct SupervisorHandle {
    tx: mpsc::UnboundedSender<SupervisorSignal>,
}

impl SupervisorHandle {
    pub fn shutdown(&self, signal: impl Into<String>) {
        let _ = self.tx.send(SupervisorSignal::Shutdown {
            signal: signal.into(),
        });
    }

    /// Reports a fault as if it came from `generation`.
    pub fn report_fatal(&self, generation: u64, reason: impl Into<String>) {
        let _ = self.tx.send(SupervisorSignal::Fatal {
            generation,
            reason: reason.into(),
        });
    }
}

/// How the host ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostExit {
    /// Signal-driven shutdown.
    Graceful,
    /// Too many consecutive restarts.
    RestartBudgetExhausted,
}

impl HostExit {
    /// Process exit status.
    pub fn code(self) -> u8 {
        match self {
            HostExit::Graceful => 0,
            HostExit::RestartBudgetExhausted => 1,
        }
    }
}

// ── Supervisor ────────────────────────────────────────────────────────────────

/// Drives the host through its lifecycle.
pub struct Supervisor {
    state: HostState,
    history: Vec<HostState>,
    budget: RestartBudget,
    generation: u64,
    start_calls: u32,
    exit: Option<HostExit>,

    transport: Arc<dyn Transport>,
    discovery: Arc<dyn DiscoveryPublisher>,
    renderer: Arc<dyn PairingCodeRenderer>,
    gateway: Arc<Gateway>,
    advertised_host: String,

    listener: Option<Box<dyn ActiveListener>>,
    descriptor: Option<ConnectionDescriptor>,

    tx: mpsc::UnboundedSender<SupervisorSignal>,
    rx: mpsc::UnboundedReceiver<SupervisorSignal>,
}

impl Supervisor {
    /// `advertised_host` is the address controllers should dial; it goes
    /// into every descriptor.
    pub fn new(
        transport: Arc<dyn Transport>,
        discovery: Arc<dyn DiscoveryPublisher>,
        renderer: Arc<dyn PairingCodeRenderer>,
        gateway: Arc<Gateway>,
        advertised_host: impl Into<String>,
        max_restart_attempts: u32,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: HostState::Idle,
            history: vec![HostState::Idle],
            budget: RestartBudget::new(max_restart_attempts),
            generation: 0,
            start_calls: 0,
            exit: None,
            transport,
            discovery,
            renderer,
            gateway,
            advertised_host: advertised_host.into(),
            listener: None,
            descriptor: None,
            tx,
            rx,
        }
    }

    pub fn handle(&self) -> SupervisorHandle {
        SupervisorHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn history(&self) -> &[HostState] {
        &self.history
    }

    pub fn restart_budget(&self) -> RestartBudget {
        self.budget
    }

    /// Number of bind attempts made.
    pub fn start_calls(&self) -> u32 {
        self.start_calls
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn descriptor(&self) -> Option<&ConnectionDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().map(|l| l.local_addr())
    }

    /// Starts the host and processes signals until it terminates.
    pub async fn run(&mut self) -> HostExit {
        if self.state == HostState::Idle {
            if let Err(e) = self.start().await {
                self.fatal(self.generation, e.to_string()).await;
            }
        }
        while self.state != HostState::Terminated {
            match self.rx.recv().await {
                Some(SupervisorSignal::Fatal { generation, reason }) => {
                    self.fatal(generation, reason).await
                }
                Some(SupervisorSignal::Shutdown { signal }) => self.shutdown(&signal).await,
                // Unreachable while `self.tx` is alive.
                None => self.shutdown("signal channel closed").await,
            }
        }
        self.exit.unwrap_or(HostExit::Graceful)
    }

    /// `Idle | Restarting -> Starting -> Listening`.
    ///
    /// On success the budget is reset, a fresh descriptor is published and
    /// rendered.  Discovery and rendering failures are logged only.
    ///
    /// # Errors
    ///
    /// Returns the bind failure; the host is left in `Starting`.
    pub async fn start(&mut self) -> Result<(), TransportError> {
        if !self.transition(HostState::Starting) {
            return Ok(());
        }
        self.start_calls += 1;
        self.generation += 1;
        let faults = FaultReporter::new(self.tx.clone(), self.generation);

        let listener = self.transport.bind(Arc::clone(&self.gateway), faults).await?;
        let addr = listener.local_addr();
        self.listener = Some(listener);
        self.transition(HostState::Listening);
        self.budget.reset();

        let descriptor = ConnectionDescriptor::new(self.advertised_host.clone(), addr.port());
        info!(
            generation = self.generation,
            "listening on {addr}; controllers connect to {}",
            descriptor.url()
        );
        if let Err(e) = self.discovery.publish(&descriptor).await {
            warn!("discovery publish failed: {e}");
        }
        if let Err(e) = self.renderer.render(&descriptor) {
            warn!("pairing code unavailable: {e}");
        }
        self.descriptor = Some(descriptor);
        Ok(())
    }

    /// Tears down and restarts after a fatal fault, or terminates once the
    /// budget is spent.
    ///
    /// Ignored unless the host is `Starting` or `Listening`, and ignored for
    /// faults from an earlier generation.
    pub async fn fatal(&mut self, generation: u64, reason: String) {
        if !self.state.accepts_fatal() {
            debug!(state = %self.state, %reason, "ignoring fatal fault");
            return;
        }
        if generation != self.generation {
            debug!(generation, current = self.generation, %reason, "ignoring stale fault");
            return;
        }

        let mut reason = reason;
        loop {
            error!(generation = self.generation, "fatal: {reason}");
            self.transition(HostState::Restarting);
            self.cleanup().await;

            if let Some(signal) = self.pending_shutdown() {
                self.shutdown(&signal).await;
                return;
            }

            if self.budget.is_exhausted() {
                error!(
                    max = self.budget.max(),
                    "restart budget exhausted; giving up"
                );
                self.terminate(HostExit::RestartBudgetExhausted).await;
                return;
            }

            let attempt = self.budget.record_restart();
            warn!(attempt, max = self.budget.max(), "restarting host");
            match self.start().await {
                Ok(()) => return,
                Err(e) => reason = e.to_string(),
            }
        }
    }

    /// Graceful stop from any state but `ShuttingDown`/`Terminated`.  A second
    /// call is a no-op.
    pub async fn shutdown(&mut self, signal: &str) {
        if !self.state.accepts_shutdown() {
            debug!(%signal, state = %self.state, "shutdown already in progress");
            return;
        }
        info!(%signal, "shutting down");
        self.transition(HostState::ShuttingDown);
        self.cleanup().await;
        self.terminate(HostExit::Graceful).await;
    }

    /// Parallel best-effort teardown of discovery, client sessions and the
    /// listener; the client set is always cleared last.
    async fn cleanup(&mut self) {
        let listener = self.listener.take();
        let discovery = Arc::clone(&self.discovery);
        let gateway = Arc::clone(&self.gateway);

        let (unpublished, (), ()) = tokio::join!(
            async move { discovery.unpublish().await },
            async move { gateway.close_all().await },
            async move {
                if let Some(mut listener) = listener {
                    listener.stop().await;
                }
            },
        );
        if let Err(e) = unpublished {
            warn!("discovery unpublish failed: {e}");
        }

        self.gateway.clear().await;
        self.descriptor = None;
    }

    async fn terminate(&mut self, exit: HostExit) {
        self.transition(HostState::Terminated);
        self.discovery.shutdown().await;
        self.exit = Some(exit);
        info!(code = exit.code(), "host terminated");
    }

    /// Drains queued signals, returning the first shutdown request.  Queued
    /// faults belong to torn-down generations and are dropped.
    fn pending_shutdown(&mut self) -> Option<String> {
        while let Ok(signal) = self.rx.try_recv() {
            if let SupervisorSignal::Shutdown { signal } = signal {
                return Some(signal);
            }
        }
        None
    }

    fn transition(&mut self, next: HostState) -> bool {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "rejected state transition");
            return false;
        }
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
        self.history.push(next);
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
