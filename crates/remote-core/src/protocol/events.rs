//! Client → host event taxonomy.
//!
//! Every frame a controller sends decodes into exactly one [`InputEvent`].
//! The set of kinds is closed: a frame whose `type` is not listed in
//! [`EVENT_KINDS`] is rejected by the codec before it reaches any handler.
//!
//! # Why keep raw strings in some variants?
//!
//! `MouseClick::button`, `Key::modifiers` and `Command::name` are carried
//! exactly as the controller sent them.  Normalizing them (button fallback
//! to `left`, modifier synonyms, command synonyms) is the dispatcher's job,
//! so the parsed event stays a faithful, immutable record of the frame and
//! the normalization rules live in one place.

use serde_json::Value;

/// Wire `type` values accepted by the codec.
///
/// `key_press` and `key_tap` both decode to [`InputEvent::Key`]; the
/// distinction on the wire is informational only, the `action` field decides
/// what happens.
pub const EVENT_KINDS: [&str; 8] = [
    "mouse_move",
    "mouse_click",
    "mouse_scroll",
    "key_press",
    "key_tap",
    "text_input",
    "command",
    "heartbeat",
];

/// What to do with a key: a full tap, or only one half of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyAction {
    /// Press and release.
    #[default]
    Tap,
    /// Press and hold.
    Press,
    /// Release a previously held key.
    Release,
}

impl KeyAction {
    /// Parses the wire `action` field.  Anything other than `press` or
    /// `release` (including an absent field) is a tap.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(a) if a.eq_ignore_ascii_case("press") => Self::Press,
            Some(a) if a.eq_ignore_ascii_case("release") => Self::Release,
            _ => Self::Tap,
        }
    }

    /// Lower-case label used in log messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::Press => "press",
            Self::Release => "release",
        }
    }
}

/// One validated input-intent frame.  Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Relative pointer motion in (possibly fractional) pixels.
    MouseMove { dx: f64, dy: f64 },

    /// A pointer button click.  `button` is the raw wire value.
    MouseClick { button: String, double: bool },

    /// Scroll wheel motion; each whole unit is one discrete tick.
    MouseScroll { sx: f64, sy: f64 },

    /// A key tap, press or release.  `key` is `None` when the frame carried
    /// no key at all; the dispatcher treats that as a logged no-op.
    Key {
        key: Option<String>,
        action: KeyAction,
        modifiers: Vec<String>,
    },

    /// A run of literal text to type.
    TextInput { text: String },

    /// A named host command such as `"volume.up"` with free-form arguments.
    Command { name: String, args: Vec<Value> },

    /// Keepalive; answered by the gateway without touching any backend.
    Heartbeat,
}

impl InputEvent {
    /// Short kind name for log messages.
    ///
    /// Used instead of `{:?}` so that typed text never lands in the logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::MouseMove { .. } => "mouse_move",
            Self::MouseClick { .. } => "mouse_click",
            Self::MouseScroll { .. } => "mouse_scroll",
            Self::Key { .. } => "key",
            Self::TextInput { .. } => "text_input",
            Self::Command { .. } => "command",
            Self::Heartbeat => "heartbeat",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
