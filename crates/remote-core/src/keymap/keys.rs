//! Key names as controllers send them.
//!
//! Controllers send keys as short strings: a single printable character
//! (`"a"`, `"7"`, `"/"`) or a name (`"enter"`, `"pagedown"`, `"f5"`).  Names
//! are matched case-insensitively and several spellings map to the same key.

/// A non-character key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Tab,
    Space,
    Backspace,
    Escape,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function key `F1`..=`F12`.
    F(u8),
    CapsLock,
    Shift,
    Control,
    Alt,
    Super,
}

/// A key a controller asked the host to tap, press, or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    /// A single printable character, case preserved.
    Char(char),
    /// A named key.
    Named(NamedKey),
}

impl KeyName {
    /// Parses a wire key string.
    ///
    /// Returns `None` for empty strings and for multi-character names that
    /// are not in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_core::{KeyName, NamedKey};
    ///
    /// assert_eq!(KeyName::parse("A"), Some(KeyName::Char('A')));
    /// assert_eq!(KeyName::parse("Return"), Some(KeyName::Named(NamedKey::Enter)));
    /// assert_eq!(KeyName::parse("f11"), Some(KeyName::Named(NamedKey::F(11))));
    /// assert_eq!(KeyName::parse("hyperspace"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        // A lone space is a character, not whitespace to trim.
        if raw == " " {
            return Some(Self::Named(NamedKey::Space));
        }
        let raw = raw.trim();
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) => Some(Self::Char(c)),
            _ => named_key(&raw.to_ascii_lowercase()).map(Self::Named),
        }
    }
}

fn named_key(lower: &str) -> Option<NamedKey> {
    let key = match lower {
        "enter" | "return" => NamedKey::Enter,
        "tab" => NamedKey::Tab,
        "space" | "spacebar" => NamedKey::Space,
        "backspace" => NamedKey::Backspace,
        "escape" | "esc" => NamedKey::Escape,
        "delete" | "del" | "forward_delete" => NamedKey::Delete,
        "home" => NamedKey::Home,
        "end" => NamedKey::End,
        "pageup" | "page_up" | "pgup" => NamedKey::PageUp,
        "pagedown" | "page_down" | "pgdn" => NamedKey::PageDown,
        "up" | "arrowup" | "arrow_up" => NamedKey::Up,
        "down" | "arrowdown" | "arrow_down" => NamedKey::Down,
        "left" | "arrowleft" | "arrow_left" => NamedKey::Left,
        "right" | "arrowright" | "arrow_right" => NamedKey::Right,
        "capslock" | "caps_lock" => NamedKey::CapsLock,
        "shift" => NamedKey::Shift,
        "control" | "ctrl" => NamedKey::Control,
        "alt" | "option" => NamedKey::Alt,
        "super" | "cmd" | "command" | "win" | "meta" => NamedKey::Super,
        other => {
            let n: u8 = other.strip_prefix('f')?.parse().ok()?;
            if (1..=12).contains(&n) {
                NamedKey::F(n)
            } else {
                return None;
            }
        }
    };
    Some(key)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
