//! Canonical modifier set.
//!
//! Controllers on different platforms name modifiers differently: an iOS
//! client says `cmd`, an Android client says `meta`, a web client may say
//! `Win`.  All of these collapse onto five canonical modifiers.
//!
//! [`ModifierSet`] is a compact bit set in the same spirit as a HID modifier
//! byte: one bit per modifier, iteration always in canonical order
//! (`super`, `ctrl`, `alt`, `shift`, `caps`) so that backends produce
//! deterministic key combinations.

use std::fmt;

/// One canonical modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Super,
    Ctrl,
    Alt,
    Shift,
    Caps,
}

impl Modifier {
    /// All modifiers in canonical order.
    pub const ALL: [Modifier; 5] = [
        Modifier::Super,
        Modifier::Ctrl,
        Modifier::Alt,
        Modifier::Shift,
        Modifier::Caps,
    ];

    /// Resolves a wire modifier name through the synonym table
    /// (case-insensitive, surrounding whitespace ignored).
    pub fn from_name(raw: &str) -> Option<Self> {
        let modifier = match raw.trim().to_ascii_lowercase().as_str() {
            "super" | "cmd" | "command" | "win" | "windows" | "meta" => Self::Super,
            "ctrl" | "control" => Self::Ctrl,
            "alt" | "option" | "opt" => Self::Alt,
            "shift" => Self::Shift,
            "caps" | "capslock" | "caps_lock" => Self::Caps,
            _ => return None,
        };
        Some(modifier)
    }

    /// The canonical lower-case name.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Super => "super",
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Caps => "caps",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Super => 0x01,
            Self::Ctrl => 0x02,
            Self::Alt => 0x04,
            Self::Shift => 0x08,
            Self::Caps => 0x10,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// A set of canonical modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a set from wire names.
    ///
    /// Returns the set together with the names that matched no synonym so
    /// the caller can log them.  Duplicates (`["cmd", "meta"]`) collapse.
    pub fn from_names<I, S>(names: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        let mut unknown = Vec::new();
        for name in names {
            match Modifier::from_name(name.as_ref()) {
                Some(m) => set.insert(m),
                None => unknown.push(name.as_ref().to_string()),
            }
        }
        (set, unknown)
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the members in canonical order.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<T: IntoIterator<Item = Modifier>>(iter: T) -> Self {
        let mut set = Self::empty();
        for m in iter {
            set.insert(m);
        }
        set
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_synonyms() {
        for name in ["cmd", "Command", "WIN", "windows", "meta", "super"] {
            assert_eq!(Modifier::from_name(name), Some(Modifier::Super), "{name}");
        }
    }

    #[test]
    fn test_other_synonyms() {
        assert_eq!(Modifier::from_name("Control"), Some(Modifier::Ctrl));
        assert_eq!(Modifier::from_name("option"), Some(Modifier::Alt));
        assert_eq!(Modifier::from_name(" SHIFT "), Some(Modifier::Shift));
        assert_eq!(Modifier::from_name("CapsLock"), Some(Modifier::Caps));
        assert_eq!(Modifier::from_name("hyper"), None);
    }

    #[test]
    fn test_from_names_collapses_duplicates_and_reports_unknown() {
        // Arrange
        let names = ["cmd", "META", "shift", "fn"];

        // Act
        let (set, unknown) = ModifierSet::from_names(names);

        // Assert
        assert_eq!(set.len(), 2);
        assert!(set.contains(Modifier::Super));
        assert!(set.contains(Modifier::Shift));
        assert_eq!(unknown, vec!["fn".to_string()]);
    }

    #[test]
    fn test_iteration_is_in_canonical_order() {
        let set: ModifierSet = [Modifier::Shift, Modifier::Super, Modifier::Ctrl]
            .into_iter()
            .collect();
        let order: Vec<_> = set.iter().map(Modifier::canonical_name).collect();
        assert_eq!(order, vec!["super", "ctrl", "shift"]);
    }

    #[test]
    fn test_empty_set() {
        let set = ModifierSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
