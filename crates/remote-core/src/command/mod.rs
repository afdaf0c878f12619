//! Command canonicalization.
//!
//! Controllers name the same command in many ways: `volume.up`,
//! `volume_up`, `Media-Volume-Up`, `media volume up`.  Instead of a chain of
//! string comparisons, every accepted spelling lives in one static table
//! keyed by its normalized form, built once on first use.  Canonicalizing a
//! name is then a pure lookup.
//!
//! # Normalization
//!
//! The raw name is trimmed and lower-cased, then rewritten two ways:
//!
//! - **dot form**: every run of `_`, `-`, `.` or whitespace becomes `.`
//! - **underscore form**: every such run becomes `_`
//!
//! Both forms are looked up; either hit resolves the command.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;

/// Default volume change, in percent, when a command carries no usable step.
pub const DEFAULT_VOLUME_STEP: u8 = 6;

/// The closed set of host commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalCommand {
    VolumeUp,
    VolumeDown,
    MuteToggle,
}

impl CanonicalCommand {
    /// Stable kebab-case identifier used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VolumeUp => "volume-up",
            Self::VolumeDown => "volume-down",
            Self::MuteToggle => "mute-toggle",
        }
    }
}

/// Accepted spellings, written in underscore form.  The table also stores
/// the dot form of each entry.
const SYNONYMS: &[(&str, CanonicalCommand)] = &[
    ("volume_up", CanonicalCommand::VolumeUp),
    ("media_volume_up", CanonicalCommand::VolumeUp),
    ("volume_down", CanonicalCommand::VolumeDown),
    ("media_volume_down", CanonicalCommand::VolumeDown),
    ("volume_mute", CanonicalCommand::MuteToggle),
    ("media_volume_mute", CanonicalCommand::MuteToggle),
    ("media_mute", CanonicalCommand::MuteToggle),
    ("mute", CanonicalCommand::MuteToggle),
    ("mute_toggle", CanonicalCommand::MuteToggle),
    ("toggle_mute", CanonicalCommand::MuteToggle),
];

fn table() -> &'static HashMap<String, CanonicalCommand> {
    static TABLE: OnceLock<HashMap<String, CanonicalCommand>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::with_capacity(SYNONYMS.len() * 2);
        for (spelling, command) in SYNONYMS {
            table.insert(normalize(spelling, '_'), *command);
            table.insert(normalize(spelling, '.'), *command);
        }
        table
    })
}

/// Collapses every run of separator characters into a single `sep`.
fn normalize(raw: &str, sep: char) -> String {
    let lower = raw.trim().to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut in_run = false;
    for c in lower.chars() {
        if matches!(c, '_' | '-' | '.') || c.is_whitespace() {
            if !in_run {
                out.push(sep);
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Resolves a free-form command name.
///
/// # Examples
///
/// ```rust
/// use remote_core::{canonicalize, CanonicalCommand};
///
/// assert_eq!(canonicalize("media.volume_up"), Some(CanonicalCommand::VolumeUp));
/// assert_eq!(canonicalize("Volume Down"), Some(CanonicalCommand::VolumeDown));
/// assert_eq!(canonicalize("reboot"), None);
/// ```
pub fn canonicalize(raw: &str) -> Option<CanonicalCommand> {
    let table = table();
    table
        .get(&normalize(raw, '.'))
        .or_else(|| table.get(&normalize(raw, '_')))
        .copied()
}

/// Interprets a JSON value as a number: JSON numbers directly, strings by
/// parsing their trimmed contents.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Volume step in percent for a volume command's arguments.
///
/// The first argument is used when it is numeric (or a numeric string) and
/// non-zero; otherwise [`DEFAULT_VOLUME_STEP`].  The result is rounded and
/// never below 1.  Backends clamp the resulting volume to `[0, 100]`, so the
/// step itself is capped at 100.
pub fn volume_step(args: &[Value]) -> u8 {
    let requested = args
        .first()
        .and_then(numeric)
        .filter(|n| n.is_finite() && *n != 0.0)
        .unwrap_or(f64::from(DEFAULT_VOLUME_STEP));
    requested.round().clamp(1.0, 100.0) as u8
}

/// Target state of a mute command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteMode {
    /// Mute, whatever the current state.
    On,
    /// Unmute, whatever the current state.
    Off,
    /// Flip the current state.
    Toggle,
}

impl MuteMode {
    /// Reads the optional first argument: `on`/`true` mutes, `off`/`false`
    /// unmutes, anything else (including no argument) toggles.
    pub fn from_args(args: &[Value]) -> Self {
        let mode = match args.first() {
            Some(Value::String(s)) => s.trim().to_lowercase(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => return Self::Toggle,
        };
        match mode.as_str() {
            "on" | "true" => Self::On,
            "off" | "false" => Self::Off,
            _ => Self::Toggle,
        }
    }

    /// Past-tense label for logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::On => "muted",
            Self::Off => "unmuted",
            Self::Toggle => "toggled",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_volume_up_spellings_all_resolve() {
        for raw in [
            "volume.up",
            "volume_up",
            "media.volume_up",
            "media_volume_up",
            "Media-Volume-Up",
            "  volume   up ",
        ] {
            assert_eq!(canonicalize(raw), Some(CanonicalCommand::VolumeUp), "{raw}");
        }
    }

    #[test]
    fn test_volume_down_spellings_all_resolve() {
        for raw in ["volume.down", "volume_down", "media.volume.down", "MEDIA_VOLUME_DOWN"] {
            assert_eq!(canonicalize(raw), Some(CanonicalCommand::VolumeDown), "{raw}");
        }
    }

    #[test]
    fn test_mute_spellings_all_resolve() {
        for raw in ["volume.mute", "media.mute", "media_volume_mute", "mute", "toggle-mute"] {
            assert_eq!(canonicalize(raw), Some(CanonicalCommand::MuteToggle), "{raw}");
        }
    }

    #[test]
    fn test_unknown_commands_do_not_resolve() {
        assert_eq!(canonicalize(""), None);
        assert_eq!(canonicalize("volume"), None);
        assert_eq!(canonicalize("shutdown.now"), None);
    }

    #[test]
    fn test_normalize_collapses_separator_runs() {
        assert_eq!(normalize("a._-b", '.'), "a.b");
        assert_eq!(normalize("A B", '_'), "a_b");
    }

    #[test]
    fn test_volume_step_defaults_to_six() {
        assert_eq!(volume_step(&[]), 6);
        assert_eq!(volume_step(&[json!("loud")]), 6);
        assert_eq!(volume_step(&[json!(null)]), 6);
        assert_eq!(volume_step(&[json!(0)]), 6);
    }

    #[test]
    fn test_volume_step_rounds_and_floors_at_one() {
        assert_eq!(volume_step(&[json!(10)]), 10);
        assert_eq!(volume_step(&[json!(2.6)]), 3);
        assert_eq!(volume_step(&[json!("4")]), 4);
        assert_eq!(volume_step(&[json!(0.2)]), 1);
        assert_eq!(volume_step(&[json!(-5)]), 1);
    }

    #[test]
    fn test_volume_step_is_capped() {
        assert_eq!(volume_step(&[json!(1000)]), 100);
    }

    #[test]
    fn test_mute_on_and_true_are_the_same_target() {
        assert_eq!(MuteMode::from_args(&[json!("on")]), MuteMode::On);
        assert_eq!(MuteMode::from_args(&[json!("true")]), MuteMode::On);
        assert_eq!(MuteMode::from_args(&[json!(true)]), MuteMode::On);
    }

    #[test]
    fn test_mute_off_and_false_are_the_same_target() {
        assert_eq!(MuteMode::from_args(&[json!("OFF")]), MuteMode::Off);
        assert_eq!(MuteMode::from_args(&[json!(false)]), MuteMode::Off);
    }

    #[test]
    fn test_mute_anything_else_toggles() {
        assert_eq!(MuteMode::from_args(&[]), MuteMode::Toggle);
        assert_eq!(MuteMode::from_args(&[json!("maybe")]), MuteMode::Toggle);
        assert_eq!(MuteMode::from_args(&[json!(1)]), MuteMode::Toggle);
    }
}
