//! GPU presentation of the software surface.
//!
//! Convention: the engine rasterises at the logical resolution on the CPU; this
//! module uploads that image once per frame and scales it into the letterbox
//! rectangle computed by `DisplayAdapter`.

mod ctx;
mod present;

pub use ctx::{RenderCtx, RenderTarget};
pub use present::Presenter;
