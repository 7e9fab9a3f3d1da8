//! Desktop window and event loop.
//!
//! Owns the `winit` event loop and the single window, wires window events into the
//! engine and presents each frame through the GPU layer.

mod runtime;

pub use runtime::Runtime;
