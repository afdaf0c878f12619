//! macOS scripting shell backend: `osascript` running AppleScript for keys,
//! text and volume, and JavaScript for Automation (JXA) for pointer events.
//!
//! AppleScript's System Events cannot move or click the pointer, but JXA can
//! reach CoreGraphics through the ObjC bridge, so pointer actions post
//! `CGEvent`s from a small JXA program.  Numeric parameters are passed as
//! script arguments (`argv`) rather than spliced into the source.
//!
//! Script builders are pure functions returning the full `osascript`
//! argument list.

use std::io::ErrorKind;
use std::sync::Arc;

use async_trait::async_trait;
use remote_core::keymap::KeyMapper;
use remote_core::{
    ActionCategory, HostAction, KeyAction, KeyName, ModifierSet, MuteMode, ScrollAxis,
    VolumeDirection,
};

use super::process::ProcessRunner;
use super::tools::ToolAvailabilityCache;
use crate::application::selector::{BackendError, InputBackend};

const OSASCRIPT: &str = "osascript";

const JXA_MOVE: &str = r#"ObjC.import('ApplicationServices');
function run(argv) {
  const dx = Number(argv[0]) || 0;
  const dy = Number(argv[1]) || 0;
  const current = $.CGEventGetLocation($.CGEventCreate(null));
  const target = { x: current.x + dx, y: current.y + dy };
  const move = $.CGEventCreateMouseEvent(null, $.kCGEventMouseMoved, target, $.kCGMouseButtonLeft);
  $.CGEventPost($.kCGHIDEventTap, move);
}"#;

const JXA_CLICK: &str = r#"ObjC.import('ApplicationServices');
function run(argv) {
  const kinds = {
    left: [$.kCGEventLeftMouseDown, $.kCGEventLeftMouseUp, $.kCGMouseButtonLeft],
    right: [$.kCGEventRightMouseDown, $.kCGEventRightMouseUp, $.kCGMouseButtonRight],
    middle: [$.kCGEventOtherMouseDown, $.kCGEventOtherMouseUp, $.kCGMouseButtonCenter],
  };
  const [down, up, button] = kinds[argv[0]] || kinds.left;
  const clicks = Number(argv[1]) || 1;
  const at = $.CGEventGetLocation($.CGEventCreate(null));
  for (let n = 1; n <= clicks; n++) {
    for (const type of [down, up]) {
      const event = $.CGEventCreateMouseEvent(null, type, at, button);
      $.CGEventSetIntegerValueField(event, $.kCGMouseEventClickState, n);
      $.CGEventPost($.kCGHIDEventTap, event);
    }
  }
}"#;

const JXA_SCROLL: &str = r#"ObjC.import('ApplicationServices');
function run(argv) {
  const vertical = Number(argv[0]) || 0;
  const horizontal = Number(argv[1]) || 0;
  const event = $.CGEventCreateScrollWheelEvent(null, $.kCGScrollEventUnitLine, 2, vertical, horizontal);
  $.CGEventPost($.kCGHIDEventTap, event);
}"#;

/// Drives `osascript`.
pub struct ScriptShellBackend {
    runner: ProcessRunner,
    tools: Arc<ToolAvailabilityCache>,
}

impl ScriptShellBackend {
    pub fn new(runner: ProcessRunner, tools: Arc<ToolAvailabilityCache>) -> Self {
        Self { runner, tools }
    }
}

#[async_trait]
impl InputBackend for ScriptShellBackend {
    fn name(&self) -> &'static str {
        "script-shell"
    }

    fn supports(&self, _category: ActionCategory) -> bool {
        true
    }

    async fn perform(&self, action: &HostAction) -> Result<(), BackendError> {
        let args = osascript_args(action)?;
        self.tools.ensure(OSASCRIPT).await?;
        match self.runner.run(OSASCRIPT, &args).await {
            Err(BackendError::Spawn { source, .. }) if source.kind() == ErrorKind::NotFound => {
                self.tools.mark_missing(OSASCRIPT).await;
                Err(BackendError::Unavailable(OSASCRIPT.to_string()))
            }
            other => other,
        }
    }
}

/// Full `osascript` argument list for `action`.
fn osascript_args(action: &HostAction) -> Result<Vec<String>, BackendError> {
    let args = match action {
        HostAction::MovePointer { dx, dy } => jxa(JXA_MOVE, [dx.to_string(), dy.to_string()]),
        HostAction::Click { button, double } => {
            let clicks = if *double { "2" } else { "1" };
            jxa(JXA_CLICK, [button.as_str().to_string(), clicks.to_string()])
        }
        HostAction::Scroll { axis, steps } => {
            let (vertical, horizontal) = scroll_wheel_deltas(*axis, *steps);
            jxa(JXA_SCROLL, [vertical.to_string(), horizontal.to_string()])
        }
        HostAction::Key {
            key,
            action,
            modifiers,
        } => applescript(key_lines(*key, *action, *modifiers)?),
        HostAction::TypeText(text) => applescript([system_events(&format!(
            "keystroke {}",
            quote(text)
        ))]),
        HostAction::AdjustVolume { direction, step } => {
            applescript(volume_lines(*direction, *step))
        }
        HostAction::SetMute(mode) => applescript(mute_lines(*mode)),
    };
    Ok(args)
}

fn applescript<I: IntoIterator<Item = String>>(lines: I) -> Vec<String> {
    lines
        .into_iter()
        .flat_map(|line| ["-e".to_string(), line])
        .collect()
}

fn jxa<I: IntoIterator<Item = String>>(source: &str, argv: I) -> Vec<String> {
    let mut args = vec![
        "-l".to_string(),
        "JavaScript".to_string(),
        "-e".to_string(),
        source.to_string(),
    ];
    args.extend(argv);
    args
}

fn system_events(command: &str) -> String {
    format!("tell application \"System Events\" to {command}")
}

/// AppleScript string literal.
fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// CoreGraphics wheel deltas: positive is up (vertical) and left
/// (horizontal), the opposite of the host's scroll convention.
fn scroll_wheel_deltas(axis: ScrollAxis, steps: i32) -> (i32, i32) {
    match axis {
        ScrollAxis::Vertical => (steps.saturating_neg(), 0),
        ScrollAxis::Horizontal => (0, steps.saturating_neg()),
    }
}

/// System Events lines for a key action.  Held modifiers go down before the
/// key on press and come up after it on release.
fn key_lines(
    key: KeyName,
    action: KeyAction,
    modifiers: ModifierSet,
) -> Result<Vec<String>, BackendError> {
    let target = match key {
        KeyName::Char(c) => quote(&c.to_string()),
        KeyName::Named(named) => {
            let code = KeyMapper::macos_key_code(named).ok_or_else(|| {
                BackendError::Failed(format!("no macOS key code for {named:?}"))
            })?;
            format!("key code {code}")
        }
    };
    let held = KeyMapper::applescript_modifier_keys(modifiers);
    let commands = match (action, key) {
        (KeyAction::Tap, KeyName::Char(_)) => {
            let using = KeyMapper::applescript_using_clause(modifiers);
            vec![format!("keystroke {target}{using}")]
        }
        (KeyAction::Tap, KeyName::Named(_)) => {
            let using = KeyMapper::applescript_using_clause(modifiers);
            vec![format!("{target}{using}")]
        }
        (KeyAction::Press, _) => held
            .map(|mods| format!("key down {mods}"))
            .into_iter()
            .chain([format!("key down {target}")])
            .collect(),
        (KeyAction::Release, _) => std::iter::once(format!("key up {target}"))
            .chain(held.map(|mods| format!("key up {mods}")))
            .collect(),
    };
    Ok(commands.iter().map(|c| system_events(c)).collect())
}

fn volume_lines(direction: VolumeDirection, step: u8) -> Vec<String> {
    let op = match direction {
        VolumeDirection::Up => '+',
        VolumeDirection::Down => '-',
    };
    vec![
        "set curVolume to output volume of (get volume settings)".to_string(),
        format!("set newVolume to curVolume {op} {step}"),
        "if newVolume > 100 then set newVolume to 100".to_string(),
        "if newVolume < 0 then set newVolume to 0".to_string(),
        "set volume output volume newVolume".to_string(),
    ]
}

fn mute_lines(mode: MuteMode) -> Vec<String> {
    let mut lines = vec!["set isMuted to output muted of (get volume settings)".to_string()];
    match mode {
        MuteMode::On => lines.push("if isMuted is false then set volume with output muted".into()),
        MuteMode::Off => lines.push("if isMuted then set volume without output muted".into()),
        MuteMode::Toggle => lines.extend(
            [
                "if isMuted then",
                "  set volume without output muted",
                "else",
                "  set volume with output muted",
                "end if",
            ]
            .map(String::from),
        ),
    }
    lines
}

// ── Tests ─────────────────────────────────────────────────────────────────────
