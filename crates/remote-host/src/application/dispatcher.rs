//! InputDispatcher: turns validated input events into host actions.
//!
//! The dispatcher owns the two pieces of per-host input state: the
//! [`MouseAccumulator`] that carries sub-pixel motion between frames, and
//! the [`BackendSelector`] that performs the resulting actions.
//!
//! # Concurrency
//!
//! Frames from one controller are handled concurrently, so two
//! `mouse_move` handlers may interleave.  The accumulator's read-modify-write
//! happens under a `std::sync::Mutex` with no `.await` while the lock is
//! held, which keeps each update atomic.

use std::sync::{Mutex, PoisonError};

use remote_core::command::volume_step;
use remote_core::{
    canonicalize, CanonicalCommand, HostAction, InputEvent, KeyName, ModifierSet,
    MouseAccumulator, MouseButton, MuteMode, ScrollAxis, VolumeDirection,
};
use tracing::{debug, info, warn};

use crate::application::selector::{BackendSelector, DispatchOutcome};

/// Routes input events to the backend selector.
pub struct InputDispatcher {
    accumulator: Mutex<MouseAccumulator>,
    selector: BackendSelector,
}

impl InputDispatcher {
    pub fn new(selector: BackendSelector) -> Self {
        Self {
            accumulator: Mutex::new(MouseAccumulator::new()),
            selector,
        }
    }

    /// Handles one event.  Never fails: backend errors are logged by the
    /// selector and no-ops are reported as [`DispatchOutcome::Ignored`].
    pub async fn handle(&self, event: InputEvent) -> DispatchOutcome {
        match event {
            InputEvent::MouseMove { dx, dy } => {
                let step = self
                    .accumulator
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .accumulate(dx, dy);
                match step {
                    Some(step) => {
                        self.selector
                            .perform(&HostAction::MovePointer {
                                dx: step.dx,
                                dy: step.dy,
                            })
                            .await
                    }
                    None => DispatchOutcome::Ignored("sub-pixel move"),
                }
            }

            InputEvent::MouseClick { button, double } => {
                let action = HostAction::Click {
                    button: MouseButton::normalize(&button),
                    double,
                };
                self.selector.perform(&action).await
            }

            InputEvent::MouseScroll { sx, sy } => self.scroll(sx, sy).await,

            InputEvent::Key {
                key,
                action,
                modifiers,
            } => {
                let Some(raw) = key.filter(|k| !k.is_empty()) else {
                    debug!("key event without a key; ignoring");
                    return DispatchOutcome::Ignored("missing key");
                };
                let Some(key) = KeyName::parse(&raw) else {
                    warn!(key = %raw, "unknown key name; ignoring");
                    return DispatchOutcome::Ignored("unknown key");
                };
                let (modifiers, unknown) = ModifierSet::from_names(&modifiers);
                if !unknown.is_empty() {
                    debug!(?unknown, "dropping unknown modifiers");
                }
                self.selector
                    .perform(&HostAction::Key {
                        key,
                        action,
                        modifiers,
                    })
                    .await
            }

            InputEvent::TextInput { text } => {
                if text.is_empty() {
                    return DispatchOutcome::Ignored("empty text");
                }
                self.selector.perform(&HostAction::TypeText(text)).await
            }

            InputEvent::Command { name, args } => {
                let Some(command) = canonicalize(&name) else {
                    info!(command = %name, "unrecognized command; ignoring");
                    return DispatchOutcome::Ignored("unknown command");
                };
                debug!(command = command.as_str(), "dispatching command");
                let action = match command {
                    CanonicalCommand::VolumeUp => HostAction::AdjustVolume {
                        direction: VolumeDirection::Up,
                        step: volume_step(&args),
                    },
                    CanonicalCommand::VolumeDown => HostAction::AdjustVolume {
                        direction: VolumeDirection::Down,
                        step: volume_step(&args),
                    },
                    CanonicalCommand::MuteToggle => HostAction::SetMute(MuteMode::from_args(&args)),
                };
                self.selector.perform(&action).await
            }

            InputEvent::Heartbeat => DispatchOutcome::Ignored("heartbeat"),
        }
    }

    /// Each axis is rounded to whole steps and dispatched on its own;
    /// vertical first.  Returns the outcome of the last axis performed.
    async fn scroll(&self, sx: f64, sy: f64) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::Ignored("zero scroll");
        for (axis, amount) in [(ScrollAxis::Vertical, sy), (ScrollAxis::Horizontal, sx)] {
            let steps = scroll_steps(amount);
            if steps != 0 {
                outcome = self
                    .selector
                    .perform(&HostAction::Scroll { axis, steps })
                    .await;
            }
        }
        outcome
    }
}

fn scroll_steps(amount: f64) -> i32 {
    if amount.is_finite() {
        amount.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    } else {
        0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
