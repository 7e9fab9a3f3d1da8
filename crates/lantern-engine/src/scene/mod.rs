//! Scene contract and the manager that owns the active-scene switch.

mod ctx;
mod manager;

pub use ctx::{LoadDone, SceneCommand, SceneCtx};
pub use manager::{Scene, SceneManager};
