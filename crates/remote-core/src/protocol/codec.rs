//! JSON frame codec for the controller → host direction.
//!
//! Wire format: one JSON object per WebSocket frame, discriminated by its
//! `type` field.
//!
//! ```json
//! {"type":"mouse_move","deltaX":2.4,"deltaY":-0.6}
//! {"type":"key_tap","key":"a","modifiers":["cmd","shift"]}
//! {"type":"command","command":"volume.up","args":[10]}
//! ```
//!
//! Decoding happens in two passes.  The first pass checks that the frame is a
//! JSON object whose `type` is one of [`EVENT_KINDS`]; this is where the
//! human-readable `Unsupported event type` reason comes from.  The second
//! pass hands the same value to serde for the kind-specific fields, with
//! defaults for every field a controller may omit.
//!
//! [`parse_frame`] never panics and never returns anything but an
//! [`InputEvent`] or an [`InvalidFrame`].

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::events::{InputEvent, KeyAction, EVENT_KINDS};

/// A frame that could not be turned into an [`InputEvent`].
///
/// `reason` is sent back to the controller verbatim inside an `error` frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InvalidFrame {
    /// Human-readable description of what was wrong.
    pub reason: String,
}

impl InvalidFrame {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ── Wire shapes ───────────────────────────────────────────────────────────────

/// Serde view of the kind-specific fields.
///
/// Heartbeats never reach this type; they carry no fields we care about and
/// are recognised during the first pass.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    MouseMove {
        #[serde(default, rename = "deltaX")]
        delta_x: f64,
        #[serde(default, rename = "deltaY")]
        delta_y: f64,
    },
    MouseClick {
        #[serde(default)]
        button: Option<String>,
        #[serde(default)]
        double: bool,
    },
    MouseScroll {
        #[serde(default, rename = "scrollX")]
        scroll_x: f64,
        #[serde(default, rename = "scrollY")]
        scroll_y: f64,
    },
    KeyPress(WireKey),
    KeyTap(WireKey),
    TextInput {
        #[serde(default)]
        text: String,
    },
    Command {
        #[serde(default)]
        command: Option<String>,
        #[serde(default)]
        args: Vec<Value>,
    },
}

#[derive(Debug, Deserialize)]
struct WireKey {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    modifiers: Vec<String>,
}

impl From<WireKey> for InputEvent {
    fn from(wire: WireKey) -> Self {
        InputEvent::Key {
            key: wire.key,
            action: KeyAction::from_wire(wire.action.as_deref()),
            modifiers: wire.modifiers,
        }
    }
}

impl From<WireEvent> for InputEvent {
    fn from(wire: WireEvent) -> Self {
        match wire {
            WireEvent::MouseMove { delta_x, delta_y } => InputEvent::MouseMove {
                dx: delta_x,
                dy: delta_y,
            },
            WireEvent::MouseClick { button, double } => InputEvent::MouseClick {
                button: button.unwrap_or_else(|| "left".to_string()),
                double,
            },
            WireEvent::MouseScroll { scroll_x, scroll_y } => InputEvent::MouseScroll {
                sx: scroll_x,
                sy: scroll_y,
            },
            WireEvent::KeyPress(key) | WireEvent::KeyTap(key) => key.into(),
            WireEvent::TextInput { text } => InputEvent::TextInput { text },
            WireEvent::Command { command, args } => InputEvent::Command {
                name: command.unwrap_or_default(),
                args,
            },
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one raw frame into an [`InputEvent`].
///
/// Accepts anything byte-like so text and binary WebSocket frames share one
/// path.
///
/// # Errors
///
/// Returns [`InvalidFrame`] when the bytes are not JSON, the JSON is not an
/// object, the `type` is missing or outside the closed set, or a known field
/// has the wrong JSON type.
///
/// # Examples
///
/// ```rust
/// use remote_core::{parse_frame, InputEvent};
///
/// let event = parse_frame(r#"{"type":"mouse_move","deltaX":1.5}"#).unwrap();
/// assert_eq!(event, InputEvent::MouseMove { dx: 1.5, dy: 0.0 });
///
/// let err = parse_frame(r#"{"type":"teleport"}"#).unwrap_err();
/// assert_eq!(err.reason, "Unsupported event type: teleport");
/// ```
pub fn parse_frame(raw: impl AsRef<[u8]>) -> Result<InputEvent, InvalidFrame> {
    let payload: Value =
        serde_json::from_slice(raw.as_ref()).map_err(|e| InvalidFrame::new(e.to_string()))?;

    let Value::Object(fields) = &payload else {
        return Err(InvalidFrame::new("Invalid payload shape"));
    };

    let kind = match fields.get("type") {
        Some(Value::String(kind)) if EVENT_KINDS.contains(&kind.as_str()) => kind.clone(),
        Some(Value::String(kind)) => {
            return Err(InvalidFrame::new(format!("Unsupported event type: {kind}")))
        }
        Some(other) => {
            return Err(InvalidFrame::new(format!("Unsupported event type: {other}")))
        }
        None => return Err(InvalidFrame::new("Unsupported event type: <missing>")),
    };

    if kind == "heartbeat" {
        return Ok(InputEvent::Heartbeat);
    }

    serde_json::from_value::<WireEvent>(payload)
        .map(InputEvent::from)
        .map_err(|e| InvalidFrame::new(format!("Invalid {kind} frame: {e}")))
}

/// Returns `true` if `event` is a keepalive that bypasses the dispatcher.
pub fn is_heartbeat(event: &InputEvent) -> bool {
    matches!(event, InputEvent::Heartbeat)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_mouse_move_reads_camel_case_deltas() {
        // Arrange
        let raw = r#"{"type":"mouse_move","deltaX":2.5,"deltaY":-1.25}"#;

        // Act
        let event = parse_frame(raw).unwrap();

        // Assert
        assert_eq!(event, InputEvent::MouseMove { dx: 2.5, dy: -1.25 });
    }

    #[test]
    fn test_parse_mouse_move_missing_deltas_default_to_zero() {
        let event = parse_frame(r#"{"type":"mouse_move"}"#).unwrap();
        assert_eq!(event, InputEvent::MouseMove { dx: 0.0, dy: 0.0 });
    }

    #[test]
    fn test_parse_mouse_click_defaults_to_single_left() {
        let event = parse_frame(r#"{"type":"mouse_click"}"#).unwrap();
        assert_eq!(
            event,
            InputEvent::MouseClick {
                button: "left".to_string(),
                double: false
            }
        );
    }

    #[test]
    fn test_parse_mouse_click_keeps_raw_button_name() {
        // Normalization happens in the dispatcher, not the codec.
        let event = parse_frame(r#"{"type":"mouse_click","button":"Banana","double":true}"#)
            .unwrap();
        assert_eq!(
            event,
            InputEvent::MouseClick {
                button: "Banana".to_string(),
                double: true
            }
        );
    }

    #[test]
    fn test_parse_scroll_reads_both_axes() {
        let event = parse_frame(r#"{"type":"mouse_scroll","scrollX":1,"scrollY":-3}"#).unwrap();
        assert_eq!(event, InputEvent::MouseScroll { sx: 1.0, sy: -3.0 });
    }

    #[test]
    fn test_parse_key_press_and_key_tap_share_a_variant() {
        let press = parse_frame(r#"{"type":"key_press","key":"a","action":"press"}"#).unwrap();
        let tap = parse_frame(r#"{"type":"key_tap","key":"a","modifiers":["CMD"]}"#).unwrap();

        assert_eq!(
            press,
            InputEvent::Key {
                key: Some("a".to_string()),
                action: KeyAction::Press,
                modifiers: vec![],
            }
        );
        assert_eq!(
            tap,
            InputEvent::Key {
                key: Some("a".to_string()),
                action: KeyAction::Tap,
                modifiers: vec!["CMD".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_key_without_key_field_is_still_valid() {
        let event = parse_frame(r#"{"type":"key_tap"}"#).unwrap();
        assert!(matches!(event, InputEvent::Key { key: None, .. }));
    }

    #[test]
    fn test_parse_command_keeps_args_verbatim() {
        let event = parse_frame(r#"{"type":"command","command":"volume.up","args":[10,"x"]}"#)
            .unwrap();
        assert_eq!(
            event,
            InputEvent::Command {
                name: "volume.up".to_string(),
                args: vec![json!(10), json!("x")],
            }
        );
    }

    #[test]
    fn test_parse_heartbeat_ignores_extra_fields() {
        let event = parse_frame(r#"{"type":"heartbeat","timestamp":123}"#).unwrap();
        assert!(is_heartbeat(&event));
    }

    #[test]
    fn test_parse_accepts_bytes() {
        let event = parse_frame(br#"{"type":"text_input","text":"hi"}"#.as_slice()).unwrap();
        assert_eq!(
            event,
            InputEvent::TextInput {
                text: "hi".to_string()
            }
        );
    }

    // ── Rejections ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_frame("not json").unwrap_err();
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_object_payloads() {
        for raw in ["42", "\"mouse_move\"", "[1,2]", "null", "true"] {
            let err = parse_frame(raw).unwrap_err();
            assert_eq!(err.reason, "Invalid payload shape", "input: {raw}");
        }
    }

    #[test]
    fn test_parse_rejects_unknown_type_with_reason() {
        let err = parse_frame(r#"{"type":"launch_missiles"}"#).unwrap_err();
        assert_eq!(err.reason, "Unsupported event type: launch_missiles");
    }

    #[test]
    fn test_parse_rejects_missing_type() {
        let err = parse_frame(r#"{"deltaX":1}"#).unwrap_err();
        assert!(err.reason.starts_with("Unsupported event type"));
    }

    #[test]
    fn test_parse_rejects_non_string_type() {
        let err = parse_frame(r#"{"type":7}"#).unwrap_err();
        assert_eq!(err.reason, "Unsupported event type: 7");
    }

    #[test]
    fn test_parse_rejects_wrongly_typed_field() {
        let err = parse_frame(r#"{"type":"mouse_move","deltaX":"fast"}"#).unwrap_err();
        assert!(err.reason.starts_with("Invalid mouse_move frame"));
    }

    #[test]
    fn test_is_heartbeat_false_for_other_kinds() {
        assert!(!is_heartbeat(&InputEvent::TextInput {
            text: String::new()
        }));
    }
}
