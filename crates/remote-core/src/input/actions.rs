//! Actions the host performs on its own machine.
//!
//! A [`HostAction`] is what is left of an [`InputEvent`](crate::InputEvent)
//! after validation, normalization and accumulation: whole pixels, canonical
//! keys and modifiers, a canonical command.  Backends only ever see these.

use std::fmt;

use crate::command::MuteMode;
use crate::keymap::{KeyName, ModifierSet};
use crate::protocol::events::KeyAction;

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Maps a wire button name to a button.  Anything that is not `right` or
    /// `middle` (case-insensitive) is the left button.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "right" => Self::Right,
            "middle" => Self::Middle,
            _ => Self::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
        }
    }
}

/// Scroll axis.  Positive steps scroll down on the vertical axis and right on
/// the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeDirection {
    Up,
    Down,
}

/// Capability category of an action.  Backends declare which categories
/// they can perform and the selector routes by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    PointerMove,
    PointerClick,
    PointerScroll,
    Key,
    Text,
    Volume,
    Mute,
}

impl ActionCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PointerMove => "pointer-move",
            Self::PointerClick => "pointer-click",
            Self::PointerScroll => "pointer-scroll",
            Self::Key => "key",
            Self::Text => "text",
            Self::Volume => "volume",
            Self::Mute => "mute",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized action ready for an input backend.
#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    /// Relative pointer move in whole pixels; never `(0, 0)`.
    MovePointer { dx: i32, dy: i32 },
    Click { button: MouseButton, double: bool },
    /// Scroll by a non-zero number of steps along one axis.
    Scroll { axis: ScrollAxis, steps: i32 },
    Key {
        key: KeyName,
        action: KeyAction,
        modifiers: ModifierSet,
    },
    /// Non-empty text to type.
    TypeText(String),
    /// Change the output volume by `step` percent.
    AdjustVolume { direction: VolumeDirection, step: u8 },
    SetMute(MuteMode),
}

impl HostAction {
    pub fn category(&self) -> ActionCategory {
        match self {
            Self::MovePointer { .. } => ActionCategory::PointerMove,
            Self::Click { .. } => ActionCategory::PointerClick,
            Self::Scroll { .. } => ActionCategory::PointerScroll,
            Self::Key { .. } => ActionCategory::Key,
            Self::TypeText(_) => ActionCategory::Text,
            Self::AdjustVolume { .. } => ActionCategory::Volume,
            Self::SetMute(_) => ActionCategory::Mute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_normalization_defaults_to_left() {
        assert_eq!(MouseButton::normalize("right"), MouseButton::Right);
        assert_eq!(MouseButton::normalize("MIDDLE"), MouseButton::Middle);
        assert_eq!(MouseButton::normalize("left"), MouseButton::Left);
        assert_eq!(MouseButton::normalize("thumb"), MouseButton::Left);
        assert_eq!(MouseButton::normalize(""), MouseButton::Left);
    }

    #[test]
    fn test_category_of_each_action() {
        let cases = [
            (HostAction::MovePointer { dx: 1, dy: 0 }, ActionCategory::PointerMove),
            (
                HostAction::Scroll {
                    axis: ScrollAxis::Horizontal,
                    steps: -2,
                },
                ActionCategory::PointerScroll,
            ),
            (HostAction::TypeText("hi".into()), ActionCategory::Text),
            (HostAction::SetMute(MuteMode::Toggle), ActionCategory::Mute),
            (
                HostAction::AdjustVolume {
                    direction: VolumeDirection::Down,
                    step: 6,
                },
                ActionCategory::Volume,
            ),
        ];
        for (action, expected) in cases {
            assert_eq!(action.category(), expected, "{action:?}");
        }
    }
}
