//! Host input event types for keyboard, mouse, touch and wheel
//!
//! These are the raw, device-specific events a host feeds into the pipeline.
//! The adapters in [`crate::adapters`] turn them into canonical pointers.

use crate::geometry::Point;

/// An input event together with the time it occurred
#[derive(Clone, Debug, PartialEq)]
pub struct HostEvent {
    pub input: InputEvent,
    /// Milliseconds on the host's monotonic clock
    pub timestamp: f64,
}

impl HostEvent {
    pub fn new(input: InputEvent, timestamp: f64) -> Self {
        Self { input, timestamp }
    }
}

/// Input events
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Mouse event
    Mouse(MouseEvent),
    /// Keyboard event
    Keyboard(KeyboardEvent),
    /// Touch or pen contact
    Touch(TouchEvent),
    /// Scroll/wheel event
    Scroll {
        /// Horizontal scroll delta
        delta_x: f32,
        /// Vertical scroll delta
        delta_y: f32,
        /// Modifier keys held during the scroll
        modifiers: Modifiers,
    },
}

// ============================================================================
// Mouse Events
// ============================================================================

/// Mouse events
#[derive(Clone, Debug, PartialEq)]
pub enum MouseEvent {
    /// Mouse moved to position
    Moved { x: f32, y: f32, modifiers: Modifiers },
    /// Mouse button pressed
    ButtonPressed {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    /// Mouse button released
    ButtonReleased {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    /// Mouse left the window
    Left,
}

impl MouseEvent {
    /// Get the position (returns None for Left)
    pub fn position(&self) -> Option<Point> {
        match self {
            MouseEvent::Moved { x, y, .. }
            | MouseEvent::ButtonPressed { x, y, .. }
            | MouseEvent::ButtonReleased { x, y, .. } => Some(Point::new(*x, *y)),
            MouseEvent::Left => None,
        }
    }

    /// Get the button that changed state, if any
    pub fn button(&self) -> Option<MouseButton> {
        match self {
            MouseEvent::ButtonPressed { button, .. } | MouseEvent::ButtonReleased { button, .. } => {
                Some(*button)
            }
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            MouseEvent::Moved { modifiers, .. }
            | MouseEvent::ButtonPressed { modifiers, .. }
            | MouseEvent::ButtonReleased { modifiers, .. } => *modifiers,
            MouseEvent::Left => Modifiers::default(),
        }
    }
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Right mouse button
    Right,
    /// Back button (side button)
    Back,
    /// Forward button (side button)
    Forward,
    /// Other button with index
    Other(u16),
}

// ============================================================================
// Keyboard Events
// ============================================================================

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed or released
    pub key: Key,
    /// Whether the key was pressed or released
    pub state: KeyState,
    /// Modifier keys held during this event
    pub modifiers: Modifiers,
}

/// Key press/release state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Alt key (Option on macOS)
    pub alt: bool,
    /// Meta key (Command on macOS, Windows key on Windows)
    pub meta: bool,
}

impl Modifiers {
    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }
}

/// Key codes
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    // Character input
    Char(char),

    // Special keys
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,

    // Arrow keys
    Left,
    Right,
    Up,
    Down,

    // Modifier keys (for tracking state)
    Shift,
    Ctrl,
    Alt,
    Meta,

    Unknown,
}

// ============================================================================
// Touch Events
// ============================================================================

/// Kind of contact reported by a touch event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContactKind {
    #[default]
    Finger,
    Pen,
}

/// Touch events for touchscreens and pens
#[derive(Clone, Debug, PartialEq)]
pub enum TouchEvent {
    /// A touch started
    Started {
        /// Unique identifier for this touch
        id: u64,
        kind: ContactKind,
        x: f32,
        y: f32,
        /// Touch pressure (0.0 - 1.0)
        pressure: f32,
    },
    /// A touch moved
    Moved {
        id: u64,
        x: f32,
        y: f32,
        pressure: f32,
    },
    /// A touch ended
    Ended { id: u64, x: f32, y: f32 },
    /// A touch was cancelled (e.g., by system gesture)
    Cancelled { id: u64 },
}

impl TouchEvent {
    /// Get the touch ID
    pub fn id(&self) -> u64 {
        match self {
            TouchEvent::Started { id, .. }
            | TouchEvent::Moved { id, .. }
            | TouchEvent::Ended { id, .. }
            | TouchEvent::Cancelled { id } => *id,
        }
    }

    /// Get the position (returns None for Cancelled)
    pub fn position(&self) -> Option<Point> {
        match self {
            TouchEvent::Started { x, y, .. }
            | TouchEvent::Moved { x, y, .. }
            | TouchEvent::Ended { x, y, .. } => Some(Point::new(*x, *y)),
            TouchEvent::Cancelled { .. } => None,
        }
    }

    /// Get the pressure (zero once the contact has lifted)
    pub fn pressure(&self) -> f32 {
        match self {
            TouchEvent::Started { pressure, .. } | TouchEvent::Moved { pressure, .. } => *pressure,
            TouchEvent::Ended { .. } | TouchEvent::Cancelled { .. } => 0.0,
        }
    }
}
