//! Property tweening with pluggable easing curves.

mod easing;
mod scheduler;

pub use easing::Easing;
pub use scheduler::{TweenCallback, TweenHandle, TweenScheduler, TweenTarget, Tweenable};
