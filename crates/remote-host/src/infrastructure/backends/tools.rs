//! Lazy, memoized availability of external tools.
//!
//! The first time a backend needs `xdotool` (or `osascript`, or `wpctl`)
//! the cache asks its [`ToolProbe`] whether the tool exists and remembers
//! the answer for the rest of the process.  A missing tool is warned about
//! exactly once; later lookups fail quietly with
//! [`BackendError::Unavailable`] so the selector moves on.
//!
//! A tool installed while the host is running is not picked up.

use std::collections::{HashMap, HashSet};
use std::process::Stdio;

use async_trait::async_trait;
use remote_core::Capability;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::application::selector::BackendError;

/// Answers whether an external tool can be launched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolProbe: Send + Sync {
    async fn is_installed(&self, tool: &str) -> bool;
}

/// Probes with `which <tool>`.
pub struct WhichProbe;

#[async_trait]
impl ToolProbe for WhichProbe {
    async fn is_installed(&self, tool: &str) -> bool {
        tokio::process::Command::new("which")
            .arg(tool)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[derive(Default)]
struct CacheState {
    known: HashMap<String, Capability>,
    warned: HashSet<String>,
}

/// Process-lifetime availability cache shared by the CLI-driven backends.
pub struct ToolAvailabilityCache {
    probe: Box<dyn ToolProbe>,
    state: Mutex<CacheState>,
}

impl ToolAvailabilityCache {
    pub fn new(probe: Box<dyn ToolProbe>) -> Self {
        Self {
            probe,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// A cache backed by [`WhichProbe`].
    pub fn with_which() -> Self {
        Self::new(Box::new(WhichProbe))
    }

    /// Succeeds if `tool` is installed, probing on first use.
    ///
    /// The lock is held across the probe so concurrent first lookups of the
    /// same tool probe only once.
    pub async fn ensure(&self, tool: &str) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        let capability = match state.known.get(tool).copied().unwrap_or_default() {
            Capability::Untested => {
                let capability = Capability::from_probe(self.probe.is_installed(tool).await);
                debug!(tool, ?capability, "probed external tool");
                state.known.insert(tool.to_string(), capability);
                capability
            }
            known => known,
        };

        if capability.is_available() {
            return Ok(());
        }
        if state.warned.insert(tool.to_string()) {
            warn!(tool, "external tool not found; its backend is disabled");
        }
        Err(BackendError::Unavailable(tool.to_string()))
    }

    /// Records that `tool` could not be launched after all.
    pub async fn mark_missing(&self, tool: &str) {
        let mut state = self.state.lock().await;
        state.known.insert(tool.to_string(), Capability::Unavailable);
    }

    pub async fn capability(&self, tool: &str) -> Capability {
        self.state
            .lock()
            .await
            .known
            .get(tool)
            .copied()
            .unwrap_or_default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
