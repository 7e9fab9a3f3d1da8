//! Engine facade.
//!
//! `Engine` owns every service and runs the per-frame sequence. Platform runtimes
//! feed it input and resize events and call `frame` once per redraw; tests drive it
//! the same way with a manual clock.

mod engine;

pub use engine::{Engine, EngineBuilder};
