use std::collections::HashSet;

use super::types::Key;

/// Per-frame input edges.
///
/// `InputHub` keeps the held state; `InputFrame` records the transitions that happened
/// since the last clear. The engine clears it once per tick, after scene update.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys pressed this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Touch/pointer channel press edge (mouse press or short tap).
    pub touch_pressed: bool,

    /// Touch/pointer channel release edge.
    pub touch_released: bool,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.touch_pressed = false;
        self.touch_released = false;
    }
}
