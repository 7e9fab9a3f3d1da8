//! GPU device and swapchain.
//!
//! Opens the wgpu device for the window, keeps the surface configured across
//! resizes and hands out one frame at a time to the presenter.

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::{GpuFrame, SurfaceErrorAction};
pub use gpu::Gpu;
pub use init::GpuInit;
