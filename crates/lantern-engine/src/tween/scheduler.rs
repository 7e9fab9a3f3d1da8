use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::coords::Vec2;

use super::easing::Easing;

/// A value with named numeric properties that a tween can drive.
pub trait Tweenable {
    fn get(&self, prop: &str) -> Option<f32>;
    fn set(&mut self, prop: &str, value: f32);
}

impl Tweenable for HashMap<String, f32> {
    fn get(&self, prop: &str) -> Option<f32> {
        HashMap::get(self, prop).copied()
    }

    fn set(&mut self, prop: &str, value: f32) {
        if let Some(v) = self.get_mut(prop) {
            *v = value;
        }
    }
}

impl Tweenable for Vec2 {
    fn get(&self, prop: &str) -> Option<f32> {
        match prop {
            "x" => Some(self.x),
            "y" => Some(self.y),
            _ => None,
        }
    }

    fn set(&mut self, prop: &str, value: f32) {
        match prop {
            "x" => self.x = value,
            "y" => self.y = value,
            _ => {}
        }
    }
}

/// Shared, externally owned tween target.
pub type TweenTarget = Rc<RefCell<dyn Tweenable>>;

pub type TweenCallback = Box<dyn FnOnce()>;

/// Handle to a running tween. Cancelling marks it done; the scheduler drops it on its
/// next step without touching the target.
#[derive(Debug, Clone)]
pub struct TweenHandle {
    done: Rc<Cell<bool>>,
}

impl TweenHandle {
    pub fn cancel(&self) {
        self.done.set(true);
    }

    pub fn is_done(&self) -> bool {
        self.done.get()
    }
}

struct Track {
    prop: String,
    start: f32,
    end: f32,
}

struct Tween {
    target: TweenTarget,
    tracks: Vec<Track>,
    elapsed: f32,
    duration: f32,
    easing: Easing,
    on_complete: Option<TweenCallback>,
    done: Rc<Cell<bool>>,
}

/// Advances property interpolations once per tick.
#[derive(Default)]
pub struct TweenScheduler {
    active: Vec<Tween>,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts interpolating each named property of `target` from its current value to
    /// the given end value over `duration` seconds.
    ///
    /// Start values are captured now. Properties the target does not expose are
    /// skipped.
    pub fn tween<T: Tweenable + 'static>(
        &mut self,
        target: &Rc<RefCell<T>>,
        props: &[(&str, f32)],
        duration: f32,
        easing: impl Into<Easing>,
        on_complete: Option<TweenCallback>,
    ) -> TweenHandle {
        let target: TweenTarget = target.clone();
        self.tween_dyn(target, props, duration, easing.into(), on_complete)
    }

    pub fn tween_dyn(
        &mut self,
        target: TweenTarget,
        props: &[(&str, f32)],
        duration: f32,
        easing: Easing,
        on_complete: Option<TweenCallback>,
    ) -> TweenHandle {
        let tracks = {
            let t = target.borrow();
            props
                .iter()
                .filter_map(|&(prop, end)| match t.get(prop) {
                    Some(start) => Some(Track { prop: prop.to_string(), start, end }),
                    None => {
                        log::debug!("tween target has no property '{prop}'");
                        None
                    }
                })
                .collect()
        };

        let done = Rc::new(Cell::new(false));
        self.active.push(Tween {
            target,
            tracks,
            elapsed: 0.0,
            duration,
            easing,
            on_complete,
            done: done.clone(),
        });
        TweenHandle { done }
    }

    /// Advances every active tween by `dt` seconds.
    ///
    /// Completion callbacks run after all tweens have been written for this tick. A
    /// target that is borrowed elsewhere is skipped for the tick, and a tween only
    /// completes once its final value has been written.
    pub fn step(&mut self, dt: f32) {
        let mut finished: Vec<TweenCallback> = Vec::new();

        self.active.retain_mut(|tw| {
            if tw.done.get() {
                return false;
            }

            tw.elapsed += dt;
            let t = if tw.duration > 0.0 {
                (tw.elapsed / tw.duration).min(1.0)
            } else {
                1.0
            };
            let e = tw.easing.apply(t);

            let Ok(mut target) = tw.target.try_borrow_mut() else {
                // the final value must land before completion, so retry next step
                log::warn!("tween target is borrowed elsewhere; skipping write");
                return true;
            };
            for track in &tw.tracks {
                target.set(&track.prop, track.start + (track.end - track.start) * e);
            }
            drop(target);

            if t >= 1.0 {
                tw.done.set(true);
                if let Some(cb) = tw.on_complete.take() {
                    finished.push(cb);
                }
                return false;
            }
            true
        });

        for cb in finished {
            cb();
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Cancels every active tween.
    pub fn clear(&mut self) {
        for tw in self.active.drain(..) {
            tw.done.set(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn obj(x: f32) -> Rc<RefCell<HashMap<String, f32>>> {
        Rc::new(RefCell::new(HashMap::from([("x".to_string(), x)])))
    }

    fn x(o: &Rc<RefCell<HashMap<String, f32>>>) -> f32 {
        o.borrow()["x"]
    }

    #[test]
    fn linear_tween_reaches_target_and_fires_once() {
        let o = obj(0.0);
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();

        let mut tweens = TweenScheduler::new();
        let handle = tweens.tween(
            &o,
            &[("x", 10.0)],
            1.0,
            Easing::Linear,
            Some(Box::new(move || f.set(f.get() + 1))),
        );

        tweens.step(0.5);
        assert_relative_eq!(x(&o), 5.0);
        assert!(!handle.is_done());

        tweens.step(0.6);
        assert_relative_eq!(x(&o), 10.0);
        assert_eq!(fired.get(), 1);
        assert!(handle.is_done());
        assert_eq!(tweens.active_count(), 0);

        o.borrow_mut().insert("x".into(), 3.0);
        tweens.step(1.0);
        assert_relative_eq!(x(&o), 3.0);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn cancelled_tween_stops_before_next_step() {
        let o = obj(0.0);
        let mut tweens = TweenScheduler::new();
        let handle = tweens.tween(&o, &[("x", 10.0)], 1.0, "linear", None);

        tweens.step(0.25);
        handle.cancel();
        tweens.step(0.25);

        assert_relative_eq!(x(&o), 2.5);
        assert_eq!(tweens.active_count(), 0);
    }

    #[test]
    fn start_snapshot_is_taken_at_creation() {
        let o = obj(4.0);
        let mut tweens = TweenScheduler::new();
        tweens.tween(&o, &[("x", 8.0)], 2.0, Easing::Linear, None);

        // An external write between steps does not move the start point.
        o.borrow_mut().insert("x".into(), 100.0);
        tweens.step(1.0);
        assert_relative_eq!(x(&o), 6.0);
    }

    #[test]
    fn zero_duration_completes_on_first_step() {
        let p = Rc::new(RefCell::new(Vec2::new(1.0, 1.0)));
        let mut tweens = TweenScheduler::new();
        tweens.tween(&p, &[("x", 5.0), ("y", -5.0), ("z", 3.0)], 0.0, Easing::EaseOut, None);
        tweens.step(0.016);
        assert_eq!(*p.borrow(), Vec2::new(5.0, -5.0));
        assert_eq!(tweens.active_count(), 0);
    }

    #[test]
    fn borrowed_target_defers_completion_until_written() {
        let o = obj(0.0);
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let mut tweens = TweenScheduler::new();
        let handle = tweens.tween(&o, &[("x", 10.0)], 0.5, Easing::Linear, Some(Box::new(move || f.set(true))));

        {
            let _held = o.borrow();
            tweens.step(1.0);
        }
        assert_relative_eq!(x(&o), 0.0);
        assert!(!fired.get() && !handle.is_done());
        assert_eq!(tweens.active_count(), 1);

        tweens.step(0.016);
        assert_relative_eq!(x(&o), 10.0);
        assert!(fired.get() && handle.is_done());
        assert_eq!(tweens.active_count(), 0);
    }

    #[test]
    fn clear_cancels_everything() {
        let o = obj(0.0);
        let mut tweens = TweenScheduler::new();
        let h = tweens.tween(&o, &[("x", 1.0)], 1.0, Easing::Linear, None);
        tweens.clear();
        assert!(h.is_done());
        assert_eq!(tweens.active_count(), 0);
    }
}
