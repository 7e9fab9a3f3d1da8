use std::collections::{HashMap, HashSet};

use super::types::Key;

/// Physical sources that drive one named action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionBinding {
    pub keys: HashSet<Key>,

    /// Whether the shared touch/pointer channel also drives this action.
    pub touch: bool,
}

impl ActionBinding {
    pub fn keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self { keys: keys.into_iter().collect(), touch: false }
    }

    pub fn with_touch(mut self) -> Self {
        self.touch = true;
        self
    }
}

/// Action name -> binding.
pub type ActionTable = HashMap<String, ActionBinding>;

/// Bindings installed on every new `InputHub`.
pub fn default_actions() -> ActionTable {
    let mut t = ActionTable::new();
    t.insert("jump".into(), ActionBinding::keys([Key::Space, Key::ArrowUp, Key::W]).with_touch());
    t.insert("left".into(), ActionBinding::keys([Key::ArrowLeft, Key::A]));
    t.insert("right".into(), ActionBinding::keys([Key::ArrowRight, Key::D]));
    t.insert("down".into(), ActionBinding::keys([Key::ArrowDown, Key::S]));
    t.insert("enter".into(), ActionBinding::keys([Key::Enter]).with_touch());
    t.insert("pause".into(), ActionBinding::keys([Key::Escape, Key::P]));
    t
}

/// Keys whose platform default (page scroll and the like) is suppressed.
pub const SUPPRESSED_KEYS: [Key; 5] = [
    Key::Space,
    Key::ArrowUp,
    Key::ArrowDown,
    Key::ArrowLeft,
    Key::ArrowRight,
];
