//! macOS virtual key codes and AppleScript modifier terms.
//!
//! AppleScript can type printable characters with `keystroke "c"`, but named
//! keys (Return, arrows, function keys) need `key code N` with the Carbon
//! virtual key code from `HIToolbox/Events.h`.

use super::keys::NamedKey;
use super::modifiers::Modifier;

/// Carbon virtual key code for a named key.
///
/// Bare modifier keys return `None`: AppleScript can only apply them through
/// a `using {...}` clause.
pub fn virtual_key_code(key: NamedKey) -> Option<u16> {
    let code = match key {
        NamedKey::Enter => 0x24,
        NamedKey::Tab => 0x30,
        NamedKey::Space => 0x31,
        NamedKey::Backspace => 0x33,
        NamedKey::Escape => 0x35,
        NamedKey::Delete => 0x75,
        NamedKey::Home => 0x73,
        NamedKey::End => 0x77,
        NamedKey::PageUp => 0x74,
        NamedKey::PageDown => 0x79,
        NamedKey::Left => 0x7B,
        NamedKey::Right => 0x7C,
        NamedKey::Down => 0x7D,
        NamedKey::Up => 0x7E,
        NamedKey::F(n) => function_key_code(n)?,
        NamedKey::CapsLock
        | NamedKey::Shift
        | NamedKey::Control
        | NamedKey::Alt
        | NamedKey::Super => return None,
    };
    Some(code)
}

fn function_key_code(n: u8) -> Option<u16> {
    let code = match n {
        1 => 0x7A,
        2 => 0x78,
        3 => 0x63,
        4 => 0x76,
        5 => 0x60,
        6 => 0x61,
        7 => 0x62,
        8 => 0x64,
        9 => 0x65,
        10 => 0x6D,
        11 => 0x67,
        12 => 0x6F,
        _ => return None,
    };
    Some(code)
}

/// The term used inside an AppleScript `using {...}` clause.
///
/// System Events has no caps-lock modifier, so `Caps` returns `None`.
pub fn applescript_modifier(modifier: Modifier) -> Option<&'static str> {
    match modifier {
        Modifier::Super => Some("command down"),
        Modifier::Ctrl => Some("control down"),
        Modifier::Alt => Some("option down"),
        Modifier::Shift => Some("shift down"),
        Modifier::Caps => None,
    }
}

/// The modifier key name accepted by System Events `key down` and `key up`.
pub fn applescript_modifier_key(modifier: Modifier) -> Option<&'static str> {
    match modifier {
        Modifier::Super => Some("command"),
        Modifier::Ctrl => Some("control"),
        Modifier::Alt => Some("option"),
        Modifier::Shift => Some("shift"),
        Modifier::Caps => None,
    }
}
