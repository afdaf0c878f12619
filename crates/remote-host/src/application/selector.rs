//! Platform backend selection.
//!
//! Every action category has an ordered chain of backends.  The selector
//! walks the chain, skipping backends that do not support the category or
//! report themselves unavailable, and stops at the first that succeeds.  If
//! none does, the intended action is logged and nothing physical happens.
//!
//! # Failure policy (for beginners)
//!
//! Backend failures never travel back to the controller.  A failed `xdotool`
//! call is logged with the backend's name and the next backend is tried.
//! From the caller's point of view [`BackendSelector::perform`] cannot fail:
//! it always returns a [`DispatchOutcome`] describing what happened.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use remote_core::{ActionCategory, HostAction};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error type for a single backend invocation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{backend} cannot perform {category} actions")]
    Unsupported {
        backend: &'static str,
        category: ActionCategory,
    },

    /// The backend (or the tool it drives) is not present on this machine.
    /// The selector skips these quietly; the backend warns once itself.
    #[error("{0} is not available")]
    Unavailable(String),

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("`{program}` did not finish within {timeout:?} and was killed")]
    TimedOut { program: String, timeout: Duration },

    #[error("{0}")]
    Failed(String),
}

/// One mechanism capable of performing physical input actions.
#[async_trait]
pub trait InputBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this backend handles `category` at all on this platform.
    fn supports(&self, category: ActionCategory) -> bool;

    /// Performs `action`.
    ///
    /// # Errors
    ///
    /// [`BackendError::Unavailable`] when the backend cannot run here; any
    /// other variant when the attempt itself failed.
    async fn perform(&self, action: &HostAction) -> Result<(), BackendError>;
}

/// What happened to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Performed by the named backend.
    Performed(&'static str),
    /// No backend could perform it; the intent was logged.
    LoggedOnly,
    /// Nothing to do (zero move, empty text, unknown command, ...).
    Ignored(&'static str),
}

/// Ordered chain of input backends.
#[derive(Clone, Default)]
pub struct BackendSelector {
    backends: Vec<Arc<dyn InputBackend>>,
}

impl BackendSelector {
    /// `backends` in priority order, highest first.
    pub fn new(backends: Vec<Arc<dyn InputBackend>>) -> Self {
        Self { backends }
    }

    /// A selector with no backends: every action is only logged.
    pub fn log_only() -> Self {
        Self::default()
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Performs `action` with the first backend that succeeds.
    pub async fn perform(&self, action: &HostAction) -> DispatchOutcome {
        let category = action.category();
        for backend in self.backends.iter().filter(|b| b.supports(category)) {
            match backend.perform(action).await {
                Ok(()) => {
                    debug!(backend = backend.name(), %category, "action performed");
                    return DispatchOutcome::Performed(backend.name());
                }
                Err(BackendError::Unavailable(what)) => {
                    debug!(backend = backend.name(), %category, "{what} unavailable; skipping");
                }
                Err(e) => {
                    warn!(backend = backend.name(), %category, "backend failed: {e}");
                }
            }
        }
        info!(%category, "no input backend available; would {}", describe(action));
        DispatchOutcome::LoggedOnly
    }
}

/// Human-readable description for the log-only fallback.  Typed text is
/// reported by length only.
fn describe(action: &HostAction) -> String {
    match action {
        HostAction::MovePointer { dx, dy } => format!("move pointer by ({dx}, {dy})"),
        HostAction::Click { button, double } => {
            let kind = if *double { "double-click" } else { "click" };
            format!("{kind} {} button", button.as_str())
        }
        HostAction::Scroll { axis, steps } => format!("scroll {axis:?} by {steps}"),
        HostAction::Key {
            key,
            action,
            modifiers,
        } => {
            let mods: Vec<&str> = modifiers.iter().map(|m| m.canonical_name()).collect();
            format!("{} key {key:?} with [{}]", action.as_str(), mods.join(", "))
        }
        HostAction::TypeText(text) => format!("type {} characters", text.chars().count()),
        HostAction::AdjustVolume { direction, step } => {
            format!("change volume {direction:?} by {step}%")
        }
        HostAction::SetMute(mode) => format!("set mute ({})", mode.label()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::backends::mock::RecordingBackend;
    use remote_core::{MouseButton, MuteMode};

    fn selector_of(backends: &[&Arc<RecordingBackend>]) -> BackendSelector {
        BackendSelector::new(
            backends
                .iter()
                .map(|b| Arc::clone(b) as Arc<dyn InputBackend>)
                .collect(),
        )
    }

    fn click() -> HostAction {
        HostAction::Click {
            button: MouseButton::Left,
            double: false,
        }
    }

    #[tokio::test]
    async fn test_first_supporting_backend_wins() {
        // Arrange
        let first = Arc::new(RecordingBackend::new("first"));
        let second = Arc::new(RecordingBackend::new("second"));
        let selector = selector_of(&[&first, &second]);

        // Act
        let outcome = selector.perform(&click()).await;

        // Assert
        assert_eq!(outcome, DispatchOutcome::Performed("first"));
        assert_eq!(first.performed().len(), 1);
        assert!(second.performed().is_empty());
    }

    #[tokio::test]
    async fn test_failing_backend_falls_through_to_next() {
        let broken = Arc::new(RecordingBackend::failing("broken"));
        let good = Arc::new(RecordingBackend::new("good"));
        let selector = selector_of(&[&broken, &good]);

        let outcome = selector.perform(&click()).await;

        assert_eq!(outcome, DispatchOutcome::Performed("good"));
        assert_eq!(broken.attempts(), 1);
        assert_eq!(good.performed(), vec![click()]);
    }

    #[tokio::test]
    async fn test_unavailable_and_unsupporting_backends_are_skipped() {
        let missing = Arc::new(RecordingBackend::unavailable("missing"));
        let pointer_only =
            Arc::new(RecordingBackend::new("pointer").with_categories(&[ActionCategory::PointerMove]));
        let selector = selector_of(&[&missing, &pointer_only]);

        let outcome = selector.perform(&HostAction::SetMute(MuteMode::Toggle)).await;

        assert_eq!(outcome, DispatchOutcome::LoggedOnly);
        assert_eq!(missing.attempts(), 1);
        assert_eq!(pointer_only.attempts(), 0);
    }

    #[tokio::test]
    async fn test_log_only_selector_never_fails() {
        let outcome = BackendSelector::log_only()
            .perform(&HostAction::TypeText("secret".into()))
            .await;
        assert_eq!(outcome, DispatchOutcome::LoggedOnly);
    }

    #[test]
    fn test_describe_hides_typed_text() {
        let text = describe(&HostAction::TypeText("hunter2".into()));
        assert_eq!(text, "type 7 characters");
        assert!(!text.contains("hunter2"));
    }
}
