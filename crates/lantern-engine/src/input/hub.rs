use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::coords::Vec2;

use super::actions::{default_actions, ActionBinding, ActionTable, SUPPRESSED_KEYS};
use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, MouseButton, TouchPhase};

/// Keyboard, touch and mouse unified into named actions.
///
/// Keys are tracked individually. Touch contacts and the left mouse button share a
/// single pointer channel, which an action opts into with `ActionBinding::touch`.
/// Positions handed in are expected to be logical pixels.
#[derive(Debug)]
pub struct InputHub {
    actions: ActionTable,
    keys_down: HashSet<Key>,
    frame: InputFrame,

    touch_down: bool,
    touch_started: Option<Instant>,
    primary_touch: Option<u64>,
    touch_pos: Vec2,
    mouse_pos: Vec2,

    tap_threshold: Duration,
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

impl InputHub {
    pub fn new(tap_threshold: Duration) -> Self {
        Self {
            actions: default_actions(),
            keys_down: HashSet::new(),
            frame: InputFrame::default(),
            touch_down: false,
            touch_started: None,
            primary_touch: None,
            touch_pos: Vec2::ZERO,
            mouse_pos: Vec2::ZERO,
            tap_threshold,
        }
    }

    /// Replaces the whole binding table.
    pub fn set_actions(&mut self, actions: ActionTable) {
        self.actions = actions;
    }

    /// Adds or replaces a single binding.
    pub fn bind(&mut self, name: impl Into<String>, binding: ActionBinding) {
        self.actions.insert(name.into(), binding);
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    pub fn is_down(&self, action: &str) -> bool {
        self.query(action, |k| self.keys_down.contains(k), self.touch_down)
    }

    pub fn just_pressed(&self, action: &str) -> bool {
        self.query(action, |k| self.frame.keys_pressed.contains(k), self.frame.touch_pressed)
    }

    pub fn just_released(&self, action: &str) -> bool {
        self.query(action, |k| self.frame.keys_released.contains(k), self.frame.touch_released)
    }

    fn query(&self, action: &str, key: impl Fn(&Key) -> bool, touch: bool) -> bool {
        match self.actions.get(action) {
            Some(binding) => binding.keys.iter().any(key) || (binding.touch && touch),
            None => false,
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn key_just_pressed(&self, key: Key) -> bool {
        self.frame.keys_pressed.contains(&key)
    }

    pub fn key_just_released(&self, key: Key) -> bool {
        self.frame.keys_released.contains(&key)
    }

    pub fn touch_down(&self) -> bool {
        self.touch_down
    }

    /// Last known touch position, logical pixels.
    pub fn touch_pos(&self) -> Vec2 {
        self.touch_pos
    }

    /// Last known mouse position, logical pixels.
    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos
    }

    pub fn frame(&self) -> &InputFrame {
        &self.frame
    }

    /// Applies one event at time `now`.
    ///
    /// Returns `true` when the platform's default handling of the event should be
    /// suppressed (game keys that would otherwise scroll a page).
    pub fn apply_event(&mut self, ev: &InputEvent, now: Instant) -> bool {
        match *ev {
            InputEvent::Key { key, state, .. } => {
                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(key) {
                            self.frame.keys_pressed.insert(key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(&key) {
                            self.frame.keys_released.insert(key);
                        }
                    }
                }
                return SUPPRESSED_KEYS.contains(&key);
            }

            InputEvent::Touch { id, phase, pos } => self.apply_touch(id, phase, pos, now),

            InputEvent::PointerMoved { pos } => {
                self.mouse_pos = pos;
            }

            InputEvent::PointerButton { button: MouseButton::Left, state, pos } => {
                match state {
                    KeyState::Pressed => {
                        self.mouse_pos = pos;
                        self.touch_down = true;
                        self.frame.touch_pressed = true;
                    }
                    KeyState::Released => {
                        self.touch_down = false;
                        self.frame.touch_released = true;
                    }
                }
            }

            InputEvent::PointerButton { .. } | InputEvent::PointerLeft => {}

            InputEvent::Focused(focused) => {
                if !focused {
                    // Avoid stuck keys when focus changes mid-press.
                    self.keys_down.clear();
                    self.touch_down = false;
                    self.touch_started = None;
                    self.primary_touch = None;
                }
            }
        }
        false
    }

    fn apply_touch(&mut self, id: u64, phase: TouchPhase, pos: Vec2, now: Instant) {
        match phase {
            TouchPhase::Started => {
                if self.primary_touch.is_some() {
                    return;
                }
                self.primary_touch = Some(id);
                self.touch_down = true;
                self.touch_started = Some(now);
                self.touch_pos = pos;
            }
            TouchPhase::Moved => {
                if self.primary_touch == Some(id) {
                    self.touch_pos = pos;
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.primary_touch != Some(id) {
                    return;
                }
                self.primary_touch = None;
                self.touch_down = false;
                self.frame.touch_released = true;

                let held = self
                    .touch_started
                    .take()
                    .map(|t| now.saturating_duration_since(t));
                if phase == TouchPhase::Ended && held.is_some_and(|d| d < self.tap_threshold) {
                    self.frame.touch_pressed = true;
                }
            }
        }
    }

    /// Clears per-frame edges. Called once per tick after scene update.
    pub fn end_frame(&mut self) {
        self.frame.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    fn touch(id: u64, phase: TouchPhase) -> InputEvent {
        InputEvent::Touch { id, phase, pos: Vec2::new(10.0, 20.0) }
    }

    #[test]
    fn key_press_is_an_edge_for_one_frame() {
        let now = Instant::now();
        let mut hub = InputHub::default();

        hub.apply_event(&key(Key::Space, KeyState::Pressed), now);
        assert!(hub.just_pressed("jump"));
        assert!(hub.is_down("jump"));

        hub.end_frame();
        assert!(!hub.just_pressed("jump"));
        assert!(hub.is_down("jump"));

        // Auto-repeat while held is not a new edge.
        hub.apply_event(&key(Key::Space, KeyState::Pressed), now);
        assert!(!hub.just_pressed("jump"));

        hub.apply_event(&key(Key::Space, KeyState::Released), now);
        assert!(hub.just_released("jump"));
        assert!(!hub.is_down("jump"));
    }

    #[test]
    fn unknown_actions_are_false() {
        let mut hub = InputHub::default();
        hub.apply_event(&key(Key::Space, KeyState::Pressed), Instant::now());
        assert!(!hub.is_down("fly"));
        assert!(!hub.just_pressed("fly"));
        assert!(!hub.just_released("fly"));
    }

    #[test]
    fn set_actions_replaces_the_table() {
        let mut hub = InputHub::default();
        let mut table = ActionTable::new();
        table.insert("fire".into(), ActionBinding::keys([Key::F]));
        hub.set_actions(table);

        hub.apply_event(&key(Key::F, KeyState::Pressed), Instant::now());
        assert!(hub.is_down("fire"));
        assert!(!hub.is_down("jump"));
    }

    #[test]
    fn short_tap_synthesizes_a_press_on_release() {
        let t0 = Instant::now();
        let mut hub = InputHub::default();

        hub.apply_event(&touch(1, TouchPhase::Started), t0);
        assert!(hub.is_down("jump"));
        assert!(!hub.just_pressed("jump"));
        assert!(!hub.is_down("left"));
        assert_eq!(hub.touch_pos(), Vec2::new(10.0, 20.0));
        hub.end_frame();

        hub.apply_event(&touch(1, TouchPhase::Ended), t0 + Duration::from_millis(120));
        assert!(hub.just_pressed("jump"));
        assert!(hub.just_released("enter"));
        assert!(!hub.is_down("jump"));
    }

    #[test]
    fn long_hold_does_not_count_as_tap() {
        let t0 = Instant::now();
        let mut hub = InputHub::default();
        hub.apply_event(&touch(1, TouchPhase::Started), t0);
        hub.end_frame();
        hub.apply_event(&touch(1, TouchPhase::Ended), t0 + Duration::from_millis(500));
        assert!(!hub.just_pressed("jump"));
        assert!(hub.just_released("jump"));
    }

    #[test]
    fn secondary_touches_are_ignored() {
        let t0 = Instant::now();
        let mut hub = InputHub::default();
        hub.apply_event(&touch(1, TouchPhase::Started), t0);
        hub.apply_event(&touch(2, TouchPhase::Started), t0);
        hub.apply_event(&touch(2, TouchPhase::Ended), t0);
        assert!(hub.touch_down());
    }

    #[test]
    fn mouse_press_drives_the_pointer_channel() {
        let mut hub = InputHub::default();
        let pos = Vec2::new(4.0, 5.0);
        hub.apply_event(
            &InputEvent::PointerButton { button: MouseButton::Left, state: KeyState::Pressed, pos },
            Instant::now(),
        );
        assert!(hub.just_pressed("enter"));
        assert_eq!(hub.mouse_pos(), pos);

        hub.apply_event(
            &InputEvent::PointerButton { button: MouseButton::Right, state: KeyState::Released, pos },
            Instant::now(),
        );
        assert!(hub.is_down("enter"));
    }

    #[test]
    fn game_keys_suppress_platform_defaults() {
        let mut hub = InputHub::default();
        assert!(hub.apply_event(&key(Key::ArrowDown, KeyState::Pressed), Instant::now()));
        assert!(!hub.apply_event(&key(Key::P, KeyState::Pressed), Instant::now()));
    }

    #[test]
    fn focus_loss_releases_held_input() {
        let mut hub = InputHub::default();
        hub.apply_event(&key(Key::A, KeyState::Pressed), Instant::now());
        hub.apply_event(&touch(1, TouchPhase::Started), Instant::now());
        hub.apply_event(&InputEvent::Focused(false), Instant::now());
        assert!(!hub.is_down("left"));
        assert!(!hub.touch_down());
    }
}
