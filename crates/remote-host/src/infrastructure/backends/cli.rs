//! Command-line input tools: `xdotool` for pointer and keyboard, `wpctl`
//! (PipeWire) for the output volume.
//!
//! Argument lists are built by pure functions so they can be tested without
//! either tool installed.

use std::io::ErrorKind;
use std::sync::Arc;

use async_trait::async_trait;
use remote_core::keymap::KeyMapper;
use remote_core::{
    ActionCategory, HostAction, KeyAction, MouseButton, MuteMode, ScrollAxis, VolumeDirection,
};

use super::process::ProcessRunner;
use super::tools::ToolAvailabilityCache;
use crate::application::selector::{BackendError, InputBackend};

const XDOTOOL: &str = "xdotool";
const WPCTL: &str = "wpctl";
const DEFAULT_SINK: &str = "@DEFAULT_AUDIO_SINK@";

/// Drives `xdotool` and `wpctl`.
pub struct CliToolBackend {
    runner: ProcessRunner,
    tools: Arc<ToolAvailabilityCache>,
}

impl CliToolBackend {
    pub fn new(runner: ProcessRunner, tools: Arc<ToolAvailabilityCache>) -> Self {
        Self { runner, tools }
    }
}

#[async_trait]
impl InputBackend for CliToolBackend {
    fn name(&self) -> &'static str {
        "cli-tools"
    }

    fn supports(&self, _category: ActionCategory) -> bool {
        true
    }

    async fn perform(&self, action: &HostAction) -> Result<(), BackendError> {
        let (tool, args) = command_for(action)?;
        self.tools.ensure(tool).await?;
        match self.runner.run(tool, &args).await {
            Err(BackendError::Spawn { source, .. }) if source.kind() == ErrorKind::NotFound => {
                self.tools.mark_missing(tool).await;
                Err(BackendError::Unavailable(tool.to_string()))
            }
            other => other,
        }
    }
}

/// The tool and its arguments for `action`.
fn command_for(action: &HostAction) -> Result<(&'static str, Vec<String>), BackendError> {
    let command = match action {
        HostAction::MovePointer { dx, dy } => (XDOTOOL, xdotool_move(*dx, *dy)),
        HostAction::Click { button, double } => (XDOTOOL, xdotool_click(*button, *double)),
        HostAction::Scroll { axis, steps } => (XDOTOOL, xdotool_scroll(*axis, *steps)),
        HostAction::Key {
            key,
            action,
            modifiers,
        } => {
            let combo = KeyMapper::x11_combo(*key, *modifiers)
                .ok_or_else(|| BackendError::Failed(format!("no X11 keysym for {key:?}")))?;
            (XDOTOOL, xdotool_key(*action, combo))
        }
        HostAction::TypeText(text) => (XDOTOOL, xdotool_type(text)),
        HostAction::AdjustVolume { direction, step } => (WPCTL, wpctl_volume(*direction, *step)),
        HostAction::SetMute(mode) => (WPCTL, wpctl_mute(*mode)),
    };
    Ok(command)
}

// ── xdotool ───────────────────────────────────────────────────────────────────

fn xdotool_move(dx: i32, dy: i32) -> Vec<String> {
    // `--` keeps negative deltas from being read as options.
    vec![
        "mousemove_relative".into(),
        "--".into(),
        dx.to_string(),
        dy.to_string(),
    ]
}

fn button_number(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
    }
}

fn xdotool_click(button: MouseButton, double: bool) -> Vec<String> {
    let mut args = vec!["click".to_string()];
    if double {
        args.extend(["--repeat".to_string(), "2".to_string()]);
    }
    args.push(button_number(button).to_string());
    args
}

/// X11 scrolls with buttons 4/5 (up/down) and 6/7 (left/right), one click
/// per step.
fn xdotool_scroll(axis: ScrollAxis, steps: i32) -> Vec<String> {
    let button = match (axis, steps > 0) {
        (ScrollAxis::Vertical, false) => 4,
        (ScrollAxis::Vertical, true) => 5,
        (ScrollAxis::Horizontal, false) => 6,
        (ScrollAxis::Horizontal, true) => 7,
    };
    vec![
        "click".into(),
        "--repeat".into(),
        steps.unsigned_abs().to_string(),
        button.to_string(),
    ]
}

fn xdotool_key(action: KeyAction, combo: String) -> Vec<String> {
    let verb = match action {
        KeyAction::Tap => "key",
        KeyAction::Press => "keydown",
        KeyAction::Release => "keyup",
    };
    vec![verb.to_string(), combo]
}

fn xdotool_type(text: &str) -> Vec<String> {
    vec!["type".into(), "--".into(), text.to_string()]
}

// ── wpctl ─────────────────────────────────────────────────────────────────────

/// `-l 1.0` stops `wpctl` from raising the volume past 100%.
fn wpctl_volume(direction: VolumeDirection, step: u8) -> Vec<String> {
    let sign = match direction {
        VolumeDirection::Up => '+',
        VolumeDirection::Down => '-',
    };
    vec![
        "set-volume".into(),
        "-l".into(),
        "1.0".into(),
        DEFAULT_SINK.into(),
        format!("{step}%{sign}"),
    ]
}

fn wpctl_mute(mode: MuteMode) -> Vec<String> {
    let value = match mode {
        MuteMode::On => "1",
        MuteMode::Off => "0",
        MuteMode::Toggle => "toggle",
    };
    vec!["set-mute".into(), DEFAULT_SINK.into(), value.into()]
}

// ── Tests ─────────────────────────────────────────────────────────────────────
