//! Input model: modifier keys, mouse buttons, and the pointer gesture state.
//!
//! `Modifiers`, `Button` and `Key` capture what the host reports with each DOM
//! event. `InputState` is the pointer gesture being tracked between
//! pointer-down and pointer-up; it carries only what the engine needs to turn
//! raw pointer motion into [`crate::session::TransformDelta`]s. The geometry
//! preview itself lives in the engine's transform session.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Deserialize;

use crate::geometry::{Point, Rect};
use crate::hit::ResizeAnchor;
use crate::session::SessionHandle;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Modifiers {
    /// Shift: toggles selection on click and constrains resize and rotation.
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    /// Alt / Option: suppresses snapping for the current move.
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button; pans the view.
    Middle,
    /// Right mouse button; ignored by the engine.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`, `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete" || self.0 == "Backspace"
    }
}

/// Wheel / trackpad scroll delta in pixels.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive = down.
    pub dy: f64,
}

/// What the pointer is doing to the session's members.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragKind {
    /// Translating; deltas are taken from the previous pointer position.
    Move {
        last_page: Point,
    },
    /// Scaling from a handle; factors are derived from the total pointer travel.
    Resize {
        anchor: ResizeAnchor,
        start_page: Point,
        /// Selection bounds when the gesture began.
        orig: Rect,
    },
    /// Rotating about `pivot`; the angle is relative to where the pointer started.
    Rotate {
        pivot: Point,
        start_angle_deg: f64,
    },
}

/// Pointer gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The view is being panned.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// A transform session driven by the pointer is active.
    Transforming {
        handle: SessionHandle,
        drag: DragKind,
    },
}
