//! Color types used by the software surface and overlays.

mod color;

pub use color::Color;
