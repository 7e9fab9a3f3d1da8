//! Software drawing.
//!
//! Scenes draw into a CPU `Surface` at the logical resolution through a `Canvas`;
//! the platform presenter uploads and letterboxes the finished surface.

mod canvas;
mod raster;
mod surface;
mod text;

pub mod overlay;

pub use canvas::{Canvas, DrawOpts};
pub use surface::{Rgba8, Surface};
pub use text::{Baseline, FontSystem, TextAlign, TextStyle};
