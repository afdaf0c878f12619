//! Host lifecycle state machine and restart budget.
//!
//! ```text
//!            start()            listening
//!   Idle ─────────────► Starting ─────────► Listening
//!                          │    ▲               │
//!                   fatal  │    │ restart       │ fatal
//!                          ▼    │               ▼
//!                        Restarting ◄───────────┘
//!                          │
//!                          │ budget exhausted
//!                          ▼
//!                      Terminated ◄──── ShuttingDown ◄──── (any live state)
//! ```
//!
//! `ShuttingDown` is reachable from every state except `Terminated` and
//! itself; once entered, nothing but `Terminated` follows.

use std::fmt;

/// Restart attempts allowed before the host gives up.
pub const DEFAULT_MAX_RESTART_ATTEMPTS: u32 = 3;

/// Lifecycle state of the host supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HostState {
    /// Constructed, nothing started.
    #[default]
    Idle,
    /// Binding the listener and launching collaborators.
    Starting,
    /// Accepting controller connections.
    Listening,
    /// Tearing down after a fatal error before starting again.
    Restarting,
    /// Tearing down for good after a shutdown request.
    ShuttingDown,
    /// Final state; the process is about to exit.
    Terminated,
}

impl HostState {
    /// Returns `true` if the state machine permits `self -> next`.
    pub fn can_transition_to(self, next: HostState) -> bool {
        use HostState::*;
        matches!(
            (self, next),
            (Idle, Starting)
                | (Idle, ShuttingDown)
                | (Starting, Listening)
                | (Starting, Restarting)
                | (Starting, ShuttingDown)
                | (Listening, Restarting)
                | (Listening, ShuttingDown)
                | (Restarting, Starting)
                | (Restarting, Terminated)
                | (Restarting, ShuttingDown)
                | (ShuttingDown, Terminated)
        )
    }

    /// Whether a fatal error reported in this state triggers a restart.
    ///
    /// Faults arriving while the host is already restarting, shutting down,
    /// finished, or not yet started are ignored.
    pub fn accepts_fatal(self) -> bool {
        matches!(self, HostState::Starting | HostState::Listening)
    }

    /// Whether a shutdown request still has work to do.
    pub fn accepts_shutdown(self) -> bool {
        !matches!(self, HostState::ShuttingDown | HostState::Terminated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HostState::Idle => "idle",
            HostState::Starting => "starting",
            HostState::Listening => "listening",
            HostState::Restarting => "restarting",
            HostState::ShuttingDown => "shutting-down",
            HostState::Terminated => "terminated",
        }
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts consecutive restarts.
///
/// The count is reset by every successful start, so only an unbroken run of
/// failures can exhaust the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartBudget {
    attempts: u32,
    max: u32,
}

impl Default for RestartBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESTART_ATTEMPTS)
    }
}

impl RestartBudget {
    pub fn new(max: u32) -> Self {
        Self { attempts: 0, max }
    }

    /// `true` once `max` restarts have been used without a successful start.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max
    }

    /// Consumes one attempt and returns the new attempt number (1-based).
    pub fn record_restart(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// Called after a successful start.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
