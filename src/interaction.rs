//! Input types and the gesture state machines of the canvas.
//!
//! The canvas has a single pointer handler. Instead of attaching and detaching
//! listeners for transient gestures, it dispatches on [`ConnectState`] and
//! [`Gesture`].

use crate::graph::NodeId;
use slint::platform::{Key as SlintKey, PointerEventButton};

/// Active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Click selects, drag moves.
    #[default]
    Select,
    /// Click on empty canvas creates a node.
    Node,
    /// Click a source node, then a target node, to connect them.
    Connect,
}

/// Pending state of the connect gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectState {
    #[default]
    Idle,
    Connecting { source: NodeId },
}

impl ConnectState {
    pub fn source(&self) -> Option<&NodeId> {
        match self {
            Self::Idle => None,
            Self::Connecting { source } => Some(source),
        }
    }
}

/// Pointer gesture in progress between press and release.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    None,
    /// Moving a node. `offset` is pointer minus node position, in canvas space.
    Dragging {
        node: NodeId,
        offset: (f64, f64),
        moved: bool,
    },
    /// Panning the view. `last` is the previous pointer position, in screen space.
    Panning { last: (f64, f64) },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

impl PointerButton {
    /// Buttons the canvas does not use map to `None`.
    pub fn from_slint(button: PointerEventButton) -> Option<Self> {
        match button {
            PointerEventButton::Left => Some(Self::Left),
            PointerEventButton::Middle => Some(Self::Middle),
            PointerEventButton::Right => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub control: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        control: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.control || self.meta
    }
}

/// A pointer press, move or release in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn left(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn middle(x: f64, y: f64) -> Self {
        Self {
            button: PointerButton::Middle,
            ..Self::left(x, y)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Middle button, or Alt + left button, pans the view.
    pub fn is_pan(&self) -> bool {
        self.button == PointerButton::Middle
            || (self.button == PointerButton::Left && self.modifiers.alt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Enter,
    Escape,
    Char(char),
}

impl Key {
    /// Decode the `text` of a Slint `KeyEvent`.
    pub fn from_text(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let key = if c == char::from(SlintKey::Delete) {
            Self::Delete
        } else if c == char::from(SlintKey::Backspace) {
            Self::Backspace
        } else if c == char::from(SlintKey::Return) {
            Self::Enter
        } else if c == char::from(SlintKey::Escape) {
            Self::Escape
        } else {
            Self::Char(c)
        };
        Some(key)
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Ctrl+S / Cmd+S.
    pub fn is_save_shortcut(&self) -> bool {
        self.modifiers.command() && matches!(self.key, Key::Char('s') | Key::Char('S'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_buttons() {
        assert!(PointerInput::middle(0.0, 0.0).is_pan());
        assert!(!PointerInput::left(0.0, 0.0).is_pan());

        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        assert!(PointerInput::left(0.0, 0.0).with_modifiers(alt).is_pan());
    }

    #[test]
    fn test_save_shortcut() {
        let ctrl = Modifiers {
            control: true,
            ..Modifiers::NONE
        };
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(KeyInput::with_modifiers(Key::Char('s'), ctrl).is_save_shortcut());
        assert!(KeyInput::with_modifiers(Key::Char('S'), cmd).is_save_shortcut());
        assert!(!KeyInput::plain(Key::Char('s')).is_save_shortcut());
    }

    #[test]
    fn test_key_from_text() {
        assert_eq!(Key::from_text("\u{7f}"), Some(Key::Delete));
        assert_eq!(Key::from_text("\u{1b}"), Some(Key::Escape));
        assert_eq!(Key::from_text("\n"), Some(Key::Enter));
        assert_eq!(Key::from_text("s"), Some(Key::Char('s')));
        assert_eq!(Key::from_text(""), None);
        assert_eq!(Key::from_text("ab"), None);
    }

    #[test]
    fn test_pointer_button_from_slint() {
        assert_eq!(
            PointerButton::from_slint(PointerEventButton::Middle),
            Some(PointerButton::Middle)
        );
        assert_eq!(PointerButton::from_slint(PointerEventButton::Other), None);
    }

    #[test]
    fn test_connect_state_source() {
        assert_eq!(ConnectState::Idle.source(), None);
        let state = ConnectState::Connecting {
            source: NodeId::from("node_1"),
        };
        assert_eq!(state.source(), Some(&NodeId::from("node_1")));
    }
}
