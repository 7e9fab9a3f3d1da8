//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code translates platform events into `InputEvent`s; the engine maps their
//! positions into logical pixels and feeds them to `InputHub`.

mod actions;
mod frame;
mod hub;
mod types;

pub mod platform;

pub use actions::{default_actions, ActionBinding, ActionTable, SUPPRESSED_KEYS};
pub use frame::InputFrame;
pub use hub::InputHub;
pub use types::{InputEvent, Key, KeyState, MouseButton, TouchPhase};
