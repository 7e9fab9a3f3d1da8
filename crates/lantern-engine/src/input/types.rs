use std::fmt;
use std::str::FromStr;

use crate::coords::Vec2;

/// Physical keyboard key identifier.
///
/// Variants follow physical key positions (`W` is the key labelled W on a US layout),
/// so bindings keep working across keyboard layouts.
/// Keys the runtime does not name map to `Key::Unknown(code)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Common control keys
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers as keys
    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Lifecycle of a single touch contact.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Positions are in whatever space the producer uses; the platform translator emits
/// physical window pixels and the engine maps them to logical pixels before they
/// reach `InputHub`.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved { pos: Vec2 },

    PointerButton {
        button: MouseButton,
        state: KeyState,
        pos: Vec2,
    },

    Touch {
        id: u64,
        phase: TouchPhase,
        pos: Vec2,
    },

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

impl InputEvent {
    /// Returns the event with its position (if any) remapped by `f`.
    pub fn map_position(self, f: impl Fn(Vec2) -> Vec2) -> Self {
        match self {
            InputEvent::PointerMoved { pos } => InputEvent::PointerMoved { pos: f(pos) },
            InputEvent::PointerButton { button, state, pos } => {
                InputEvent::PointerButton { button, state, pos: f(pos) }
            }
            InputEvent::Touch { id, phase, pos } => InputEvent::Touch { id, phase, pos: f(pos) },
            other => other,
        }
    }

    /// Events that count as a user gesture for audio unlocking.
    pub fn is_user_gesture(&self) -> bool {
        matches!(
            self,
            InputEvent::Key { state: KeyState::Pressed, .. }
                | InputEvent::PointerButton { state: KeyState::Pressed, .. }
                | InputEvent::Touch { phase: TouchPhase::Started | TouchPhase::Ended, .. }
        )
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Key {
    type Err = String;

    /// Parses DOM-style key codes (`"Space"`, `"ArrowUp"`, `"KeyW"`, `"Digit1"`, `"F5"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const LETTERS: [Key; 26] = [
            Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
            Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
            Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
        ];
        const DIGITS: [Key; 10] = [
            Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
            Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
        ];
        const FKEYS: [Key; 12] = [
            Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
            Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
        ];

        let named = match s {
            "Escape" => Some(Key::Escape),
            "Enter" => Some(Key::Enter),
            "Tab" => Some(Key::Tab),
            "Backspace" => Some(Key::Backspace),
            "Space" => Some(Key::Space),
            "Insert" => Some(Key::Insert),
            "Delete" => Some(Key::Delete),
            "Home" => Some(Key::Home),
            "End" => Some(Key::End),
            "PageUp" => Some(Key::PageUp),
            "PageDown" => Some(Key::PageDown),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ShiftLeft" | "ShiftRight" => Some(Key::Shift),
            "ControlLeft" | "ControlRight" => Some(Key::Control),
            "AltLeft" | "AltRight" => Some(Key::Alt),
            "MetaLeft" | "MetaRight" => Some(Key::Meta),
            _ => None,
        };
        if let Some(key) = named {
            return Ok(key);
        }

        let single = |rest: &str| -> Option<u8> {
            let b = rest.as_bytes();
            (b.len() == 1).then(|| b[0])
        };

        if let Some(c) = s.strip_prefix("Key").and_then(single) {
            if c.is_ascii_uppercase() {
                return Ok(LETTERS[(c - b'A') as usize]);
            }
        }
        if let Some(c) = s.strip_prefix("Digit").and_then(single) {
            if c.is_ascii_digit() {
                return Ok(DIGITS[(c - b'0') as usize]);
            }
        }
        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(FKEYS[n - 1]);
            }
        }

        Err(format!("unknown key code '{s}'"))
    }
}
