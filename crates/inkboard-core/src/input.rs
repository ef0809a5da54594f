//! Normalized pointer and wheel events consumed by the interaction engine.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

/// A pointer sample in screen coordinates.
///
/// Mouse, pen and touch all arrive as this; `id` distinguishes simultaneous
/// pointers.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub id: u64,
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    pub time: Instant,
}

impl PointerEvent {
    /// Left-button event for pointer 0 with no modifiers, stamped now.
    pub fn new(position: Point) -> Self {
        Self {
            id: 0,
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            time: Instant::now(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, time: Instant) -> Self {
        self.time = time;
        self
    }
}

/// Wheel / trackpad scroll, delta in screen pixels (positive y = down).
#[derive(Debug, Clone, Copy)]
pub struct WheelEvent {
    pub delta: Vec2,
    pub position: Point,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn new(position: Point, delta: Vec2) -> Self {
        Self {
            delta,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
