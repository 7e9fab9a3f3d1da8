//! Time subsystem.
//!
//! Provides the frame scheduler and the clock abstraction it is driven by.
//! Intended usage:
//! - the engine owns one `FrameScheduler` and one `TimeSource`
//! - call `tick(now)` once per presented frame to obtain `FrameTime`
//! - tests drive time with `ManualClock`

mod clock;
mod scheduler;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use scheduler::{FrameScheduler, FrameTime};
