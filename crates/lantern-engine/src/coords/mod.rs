//! Coordinate and geometry types shared by the runtime, collision and drawing code.
//!
//! Canonical CPU space:
//! - Logical pixels (fixed game resolution)
//! - Origin top-left
//! - +X right, +Y down
//!
//! `DisplayAdapter` owns the mapping between logical pixels and the physical viewport.

mod circle;
mod display;
mod rect;
mod vec2;
mod viewport;

pub use circle::Circle;
pub use display::{DisplayAdapter, Letterbox};
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
