//! Key name parsing, canonical modifiers, and per-platform translation tables.
//!
//! The canonical representation is [`KeyName`] plus a [`ModifierSet`].
//! Platform spellings are produced at the backend boundary.

pub mod keys;
pub mod linux_x11;
pub mod macos;
pub mod modifiers;

pub use keys::{KeyName, NamedKey};
pub use modifiers::{Modifier, ModifierSet};

/// Unified key mapper providing all translation directions.
pub struct KeyMapper;

impl KeyMapper {
    /// Builds an `xdotool` key combination such as `super+shift+a`.
    ///
    /// Returns `None` if the key has no X11 spelling.
    pub fn x11_combo(key: KeyName, modifiers: ModifierSet) -> Option<String> {
        let key = linux_x11::keysym_name(key)?;
        let mut parts: Vec<&str> = modifiers.iter().map(linux_x11::modifier_keysym).collect();
        parts.push(&key);
        Some(parts.join("+"))
    }

    /// Translates a named key to a macOS virtual key code.
    pub fn macos_key_code(key: NamedKey) -> Option<u16> {
        macos::virtual_key_code(key)
    }

    /// Builds the AppleScript `using {...}` clause for a modifier set, or an
    /// empty string when no modifier applies.
    pub fn applescript_using_clause(modifiers: ModifierSet) -> String {
        let terms: Vec<&str> = modifiers
            .iter()
            .filter_map(macos::applescript_modifier)
            .collect();
        if terms.is_empty() {
            String::new()
        } else {
            format!(" using {{{}}}", terms.join(", "))
        }
    }

    /// Builds the modifier list for System Events `key down` / `key up`,
    /// such as `{command, shift}`, or `None` when no modifier applies.
    pub fn applescript_modifier_keys(modifiers: ModifierSet) -> Option<String> {
        let keys: Vec<&str> = modifiers
            .iter()
            .filter_map(macos::applescript_modifier_key)
            .collect();
        (!keys.is_empty()).then(|| format!("{{{}}}", keys.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x11_combo_orders_modifiers_canonically() {
        let (mods, _) = ModifierSet::from_names(["shift", "cmd"]);
        let combo = KeyMapper::x11_combo(KeyName::Char('a'), mods).unwrap();
        assert_eq!(combo, "super+shift+a");
    }

    #[test]
    fn test_x11_combo_without_modifiers_is_the_bare_key() {
        let combo =
            KeyMapper::x11_combo(KeyName::Named(NamedKey::Enter), ModifierSet::empty()).unwrap();
        assert_eq!(combo, "Return");
    }

    #[test]
    fn test_applescript_using_clause() {
        let (mods, _) = ModifierSet::from_names(["ctrl", "cmd", "caps"]);
        assert_eq!(
            KeyMapper::applescript_using_clause(mods),
            " using {command down, control down}"
        );
        assert_eq!(KeyMapper::applescript_using_clause(ModifierSet::empty()), "");
    }

    #[test]
    fn test_applescript_modifier_keys_follow_canonical_order() {
        let (mods, _) = ModifierSet::from_names(["shift", "cmd", "caps"]);
        assert_eq!(
            KeyMapper::applescript_modifier_keys(mods).as_deref(),
            Some("{command, shift}")
        );
        assert_eq!(KeyMapper::applescript_modifier_keys(ModifierSet::empty()), None);
    }
}
