//! Recording input backend for tests and `--dry-run` style wiring.
//!
//! The real backends move the cursor, press keys and change the volume on
//! the machine running the tests.  [`RecordingBackend`] replaces all of that
//! with in-memory recording: each performed action is pushed into a
//! `Mutex<Vec<...>>` so assertions can inspect exactly what was performed
//! and in what order.
//!
//! # Failure modes
//!
//! - [`RecordingBackend::failing`] returns [`BackendError::Failed`] from
//!   every call, to exercise the selector's fall-through path.
//! - [`RecordingBackend::unavailable`] returns
//!   [`BackendError::Unavailable`], like a missing CLI tool.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use remote_core::{ActionCategory, HostAction};

use crate::application::selector::{BackendError, InputBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Record,
    Fail,
    Unavailable,
}

/// A backend that records actions instead of performing them.
pub struct RecordingBackend {
    name: &'static str,
    mode: Mode,
    categories: Option<HashSet<ActionCategory>>,
    delay: Option<Duration>,
    performed: Mutex<Vec<HostAction>>,
    attempts: AtomicUsize,
}

impl RecordingBackend {
    /// Records every action of every category.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            mode: Mode::Record,
            categories: None,
            delay: None,
            performed: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            mode: Mode::Fail,
            ..Self::new(name)
        }
    }

    pub fn unavailable(name: &'static str) -> Self {
        Self {
            mode: Mode::Unavailable,
            ..Self::new(name)
        }
    }

    /// Restricts the categories this backend claims to support.
    pub fn with_categories(mut self, categories: &[ActionCategory]) -> Self {
        self.categories = Some(categories.iter().copied().collect());
        self
    }

    /// Sleeps before completing each action, like a slow external tool.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Snapshot of successfully performed actions, in order.
    pub fn performed(&self) -> Vec<HostAction> {
        self.performed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `perform` calls, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InputBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, category: ActionCategory) -> bool {
        self.categories
            .as_ref()
            .map_or(true, |set| set.contains(&category))
    }

    async fn perform(&self, action: &HostAction) -> Result<(), BackendError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.mode {
            Mode::Record => {
                self.performed
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(action.clone());
                Ok(())
            }
            Mode::Fail => Err(BackendError::Failed("injected failure".to_string())),
            Mode::Unavailable => Err(BackendError::Unavailable(self.name.to_string())),
        }
    }
}
