//! Native input backend built on `enigo`.
//!
//! An `enigo` context is not `Send` on every platform, so it lives on a
//! dedicated worker thread.  Actions are sent over a channel and each one
//! carries a oneshot reply so the async caller can await the result without
//! blocking the runtime.
//!
//! The context is created on the first action, and the probe reads the
//! cursor position once.  If either fails (no display, no accessibility
//! permission) the backend reports itself unavailable for the rest of the
//! process and the selector falls through to the next backend.

use std::sync::mpsc;
use std::thread;

use async_trait::async_trait;
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use remote_core::{
    ActionCategory, Capability, HostAction, KeyAction, KeyName, Modifier, MouseButton, NamedKey,
    ScrollAxis,
};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::selector::{BackendError, InputBackend};

const BACKEND_NAME: &str = "native";

struct Job {
    action: HostAction,
    reply: oneshot::Sender<Result<(), BackendError>>,
}

/// Pointer, keyboard and text injection through the OS input APIs.
pub struct NativeBackend {
    jobs: mpsc::Sender<Job>,
}

impl NativeBackend {
    /// Starts the worker thread.  The `enigo` context is not created until
    /// the first action arrives.
    pub fn spawn() -> std::io::Result<Self> {
        let (jobs, rx) = mpsc::channel::<Job>();
        thread::Builder::new()
            .name("native-input".to_string())
            .spawn(move || run_worker(rx))?;
        Ok(Self { jobs })
    }
}

#[async_trait]
impl InputBackend for NativeBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn supports(&self, category: ActionCategory) -> bool {
        !matches!(category, ActionCategory::Volume | ActionCategory::Mute)
    }

    async fn perform(&self, action: &HostAction) -> Result<(), BackendError> {
        let (reply, result) = oneshot::channel();
        self.jobs
            .send(Job {
                action: action.clone(),
                reply,
            })
            .map_err(|_| BackendError::Unavailable("native input thread".to_string()))?;
        result
            .await
            .map_err(|_| BackendError::Failed("native input thread dropped the request".into()))?
    }
}

// ── Worker thread ─────────────────────────────────────────────────────────────

struct Worker {
    enigo: Option<Enigo>,
    capability: Capability,
}

fn run_worker(rx: mpsc::Receiver<Job>) {
    let mut worker = Worker {
        enigo: None,
        capability: Capability::Untested,
    };
    while let Ok(job) = rx.recv() {
        let result = worker.perform(&job.action);
        // The caller may have gone away; the result is simply dropped.
        let _ = job.reply.send(result);
    }
    debug!("native input thread exiting");
}

impl Worker {
    fn context(&mut self) -> Result<&mut Enigo, BackendError> {
        if self.capability == Capability::Untested {
            self.capability = match Enigo::new(&Settings::default()) {
                Ok(enigo) => match enigo.location() {
                    Ok(_) => {
                        debug!("native input backend available");
                        self.enigo = Some(enigo);
                        Capability::Available
                    }
                    Err(e) => {
                        warn!("native input backend cannot read the cursor position: {e}");
                        Capability::Unavailable
                    }
                },
                Err(e) => {
                    warn!("native input backend unavailable: {e}");
                    Capability::Unavailable
                }
            };
        }
        self.enigo
            .as_mut()
            .ok_or_else(|| BackendError::Unavailable("native input library".to_string()))
    }

    fn perform(&mut self, action: &HostAction) -> Result<(), BackendError> {
        let enigo = self.context()?;
        match action {
            HostAction::MovePointer { dx, dy } => {
                enigo.move_mouse(*dx, *dy, Coordinate::Rel).map_err(failed)
            }
            HostAction::Click { button, double } => {
                let button = enigo_button(*button);
                enigo.button(button, Direction::Click).map_err(failed)?;
                if *double {
                    enigo.button(button, Direction::Click).map_err(failed)?;
                }
                Ok(())
            }
            HostAction::Scroll { axis, steps } => {
                let axis = match axis {
                    ScrollAxis::Vertical => Axis::Vertical,
                    ScrollAxis::Horizontal => Axis::Horizontal,
                };
                enigo.scroll(*steps, axis).map_err(failed)
            }
            HostAction::Key {
                key,
                action,
                modifiers,
            } => {
                let key = enigo_key(*key);
                let modifiers: Vec<Key> = modifiers.iter().map(enigo_modifier).collect();
                match action {
                    KeyAction::Tap => {
                        for m in &modifiers {
                            enigo.key(*m, Direction::Press).map_err(failed)?;
                        }
                        let tapped = enigo.key(key, Direction::Click).map_err(failed);
                        // Release modifiers even if the tap failed.
                        for m in modifiers.iter().rev() {
                            enigo.key(*m, Direction::Release).map_err(failed)?;
                        }
                        tapped
                    }
                    KeyAction::Press => {
                        for m in &modifiers {
                            enigo.key(*m, Direction::Press).map_err(failed)?;
                        }
                        enigo.key(key, Direction::Press).map_err(failed)
                    }
                    KeyAction::Release => {
                        enigo.key(key, Direction::Release).map_err(failed)?;
                        for m in modifiers.iter().rev() {
                            enigo.key(*m, Direction::Release).map_err(failed)?;
                        }
                        Ok(())
                    }
                }
            }
            HostAction::TypeText(text) => enigo.text(text).map_err(failed),
            HostAction::AdjustVolume { .. } | HostAction::SetMute(_) => {
                Err(BackendError::Unsupported {
                    backend: BACKEND_NAME,
                    category: action.category(),
                })
            }
        }
    }
}

fn failed(e: enigo::InputError) -> BackendError {
    BackendError::Failed(e.to_string())
}

// ── Key and button mapping ────────────────────────────────────────────────────

fn enigo_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Middle => Button::Middle,
        MouseButton::Right => Button::Right,
    }
}

fn enigo_modifier(modifier: Modifier) -> Key {
    match modifier {
        Modifier::Super => Key::Meta,
        Modifier::Ctrl => Key::Control,
        Modifier::Alt => Key::Alt,
        Modifier::Shift => Key::Shift,
        Modifier::Caps => Key::CapsLock,
    }
}

fn enigo_key(key: KeyName) -> Key {
    let named = match key {
        KeyName::Char(c) => return Key::Unicode(c),
        KeyName::Named(named) => named,
    };
    match named {
        NamedKey::Enter => Key::Return,
        NamedKey::Tab => Key::Tab,
        NamedKey::Space => Key::Space,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Escape => Key::Escape,
        NamedKey::Delete => Key::Delete,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,
        NamedKey::Up => Key::UpArrow,
        NamedKey::Down => Key::DownArrow,
        NamedKey::Left => Key::LeftArrow,
        NamedKey::Right => Key::RightArrow,
        NamedKey::F(n) => function_key(n),
        NamedKey::CapsLock => Key::CapsLock,
        NamedKey::Shift => Key::Shift,
        NamedKey::Control => Key::Control,
        NamedKey::Alt => Key::Alt,
        NamedKey::Super => Key::Meta,
    }
}

fn function_key(n: u8) -> Key {
    match n {
        1 => Key::F1,
        2 => Key::F2,
        3 => Key::F3,
        4 => Key::F4,
        5 => Key::F5,
        6 => Key::F6,
        7 => Key::F7,
        8 => Key::F8,
        9 => Key::F9,
        10 => Key::F10,
        11 => Key::F11,
        _ => Key::F12,
    }
}
