//! Input events consumed by the editor and effects it reports back
//!
//! Pointer positions are display (CSS) coordinates in the host viewport; the
//! session converts them to backing pixels through its `ScreenTransform`.

use serde::{Deserialize, Serialize};

use crate::domain::{Point, ShapeColor, Tool};

/// Keyboard key, reduced to what the editor distinguishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Printable key as reported by the host (e.g. "z", "Z", "y")
    Character(String),
    Enter,
    Escape,
    Delete,
    Backspace,
    /// Any other named key
    Other(String),
}

/// Modifier key state at the time of a key event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl or Cmd, the platform command modifier
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Every input the editor session consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Text typed into the open overlay
    Text {
        text: String,
    },
    /// The overlay lost focus
    Blur,
    SelectTool {
        tool: Tool,
    },
    SetColor {
        color: ShapeColor,
    },
    SetLineWidth {
        width: f32,
    },
    SetFontSize {
        size: f32,
    },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        InputEvent::PointerDown { x, y }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        InputEvent::PointerMove { x, y }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        InputEvent::PointerUp { x, y }
    }

    pub fn key(key: Key, modifiers: Modifiers) -> Self {
        InputEvent::Key { key, modifiers }
    }

    pub fn text(text: impl Into<String>) -> Self {
        InputEvent::Text { text: text.into() }
    }
}

/// Editor commands reachable from keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    DeleteSelected,
}

/// Side effects a host must mirror after an input was handled
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The surface was recomposed; present the new frame
    Redraw,
    /// Show a text input at `position` (display coordinates)
    TextOverlayOpened {
        position: Point,
        font_size: f32,
        color: ShapeColor,
    },
    /// Hide the text input
    TextOverlayClosed { committed: bool },
}
