//! X11 keysym names, as accepted by `xdotool key`.
//!
//! `xdotool` resolves keysym *names* (`Return`, `Prior`, `Super_L`) itself,
//! so unlike a raw XTest client we never need numeric keysyms.

use super::keys::{KeyName, NamedKey};
use super::modifiers::Modifier;

/// Returns the keysym name for `key`, or `None` if it has no X11 spelling
/// we know of.
pub fn keysym_name(key: KeyName) -> Option<String> {
    match key {
        KeyName::Named(named) => Some(named_keysym(named)),
        KeyName::Char(c) => char_keysym(c),
    }
}

/// The name `xdotool` uses for a modifier inside a `+`-joined combination.
pub fn modifier_keysym(modifier: Modifier) -> &'static str {
    match modifier {
        Modifier::Super => "super",
        Modifier::Ctrl => "ctrl",
        Modifier::Alt => "alt",
        Modifier::Shift => "shift",
        Modifier::Caps => "Caps_Lock",
    }
}

fn named_keysym(key: NamedKey) -> String {
    let name = match key {
        NamedKey::Enter => "Return",
        NamedKey::Tab => "Tab",
        NamedKey::Space => "space",
        NamedKey::Backspace => "BackSpace",
        NamedKey::Escape => "Escape",
        NamedKey::Delete => "Delete",
        NamedKey::Home => "Home",
        NamedKey::End => "End",
        NamedKey::PageUp => "Prior",
        NamedKey::PageDown => "Next",
        NamedKey::Up => "Up",
        NamedKey::Down => "Down",
        NamedKey::Left => "Left",
        NamedKey::Right => "Right",
        NamedKey::F(n) => return format!("F{n}"),
        NamedKey::CapsLock => "Caps_Lock",
        NamedKey::Shift => "Shift_L",
        NamedKey::Control => "Control_L",
        NamedKey::Alt => "Alt_L",
        NamedKey::Super => "Super_L",
    };
    name.to_string()
}

fn char_keysym(c: char) -> Option<String> {
    if c.is_ascii_alphanumeric() {
        return Some(c.to_string());
    }
    let name = match c {
        ' ' => "space",
        '.' => "period",
        ',' => "comma",
        '/' => "slash",
        '\\' => "backslash",
        '-' => "minus",
        '=' => "equal",
        ';' => "semicolon",
        '\'' => "apostrophe",
        '`' => "grave",
        '[' => "bracketleft",
        ']' => "bracketright",
        _ => return None,
    };
    Some(name.to_string())
}
