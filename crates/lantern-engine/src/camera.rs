use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::coords::{Vec2, Viewport};
use crate::util::Rng;

/// Anything the camera can track.
pub trait FollowTarget {
    fn position(&self) -> Vec2;
}

impl FollowTarget for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

/// Follow parameters. Bounds default to unbounded; `lerp` 1 snaps every tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FollowOptions {
    pub offset: Vec2,
    pub min: Vec2,
    pub max: Vec2,
    pub lerp: f32,
}

impl Default for FollowOptions {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            min: Vec2::splat(f32::NEG_INFINITY),
            max: Vec2::splat(f32::INFINITY),
            lerp: 1.0,
        }
    }
}

impl FollowOptions {
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Vec2::new(x, y);
        self
    }

    /// World bounds the camera view must stay inside.
    pub fn with_bounds(mut self, min: Vec2, max: Vec2) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_lerp(mut self, lerp: f32) -> Self {
        self.lerp = lerp;
        self
    }
}

#[derive(Debug, Default, Copy, Clone)]
struct Shake {
    magnitude: f32,
    duration: f32,
    remaining: f32,
}

/// Smoothed follow-with-clamp camera with a decaying shake.
///
/// The target is held weakly; once the followed object is dropped the camera stays
/// where it is.
pub struct Camera {
    pub position: Vec2,
    target: Option<Weak<RefCell<dyn FollowTarget>>>,
    opts: FollowOptions,
    shake: Shake,
    shake_offset: Vec2,
    view: Viewport,
    rng: Rng,
}

impl Camera {
    pub fn new(view: Viewport, rng: Rng) -> Self {
        Self {
            position: Vec2::ZERO,
            target: None,
            opts: FollowOptions::default(),
            shake: Shake::default(),
            shake_offset: Vec2::ZERO,
            view,
            rng,
        }
    }

    pub fn follow<T: FollowTarget + 'static>(&mut self, target: &Rc<RefCell<T>>, opts: FollowOptions) {
        let target: Rc<RefCell<dyn FollowTarget>> = target.clone();
        self.target = Some(Rc::downgrade(&target));
        self.opts = opts;
    }

    /// Stops tracking; the camera holds its last position.
    pub fn unfollow(&mut self) {
        self.target = None;
    }

    pub fn is_following(&self) -> bool {
        self.target.as_ref().is_some_and(|w| w.strong_count() > 0)
    }

    /// (Re)starts a shake of `magnitude` pixels decaying to zero over `duration` seconds.
    pub fn shake(&mut self, magnitude: f32, duration: f32) {
        self.shake = Shake { magnitude, duration, remaining: duration };
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    pub fn shake_remaining(&self) -> f32 {
        self.shake.remaining
    }

    /// Back to the origin with no target. Runs on every scene switch; a running shake
    /// carries over into the new scene.
    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.target = None;
    }

    pub fn update(&mut self, dt: f32) {
        self.update_follow(dt);
        self.update_shake(dt);
    }

    fn update_follow(&mut self, dt: f32) {
        let Some(weak) = &self.target else { return };
        let Some(target) = weak.upgrade() else {
            log::debug!("camera target dropped; unfollowing");
            self.target = None;
            return;
        };
        let Ok(target) = target.try_borrow() else { return };

        let half = Vec2::new(self.view.width, self.view.height) * 0.5;
        let desired = target.position() + self.opts.offset - half;
        let desired = Vec2::new(
            desired.x.min(self.opts.max.x - self.view.width).max(self.opts.min.x),
            desired.y.min(self.opts.max.y - self.view.height).max(self.opts.min.y),
        );

        let t = (self.opts.lerp * dt * 60.0).clamp(0.0, 1.0);
        self.position += (desired - self.position) * t;
    }

    fn update_shake(&mut self, dt: f32) {
        if self.shake.remaining > 0.0 {
            self.shake.remaining -= dt;
            let progress = if self.shake.duration > 0.0 {
                (self.shake.remaining / self.shake.duration).max(0.0)
            } else {
                0.0
            };
            let mag = self.shake.magnitude * progress;
            self.shake_offset = Vec2::new(self.rng.signed_unit() * mag, self.rng.signed_unit() * mag);
        } else {
            self.shake_offset = Vec2::ZERO;
        }
    }

    /// Integer world-to-screen translation for this frame: `-(position + shake)`,
    /// rounded with halves going towards positive infinity.
    pub fn translation(&self) -> Vec2 {
        let p = self.position + self.shake_offset;
        -Vec2::new(round_half_up(p.x), round_half_up(p.y))
    }
}

#[inline]
fn round_half_up(v: f32) -> f32 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::new(Viewport::new(480.0, 640.0), Rng::seeded(42))
    }

    #[test]
    fn snap_follow_centers_the_target() {
        let mut cam = camera();
        let player = Rc::new(RefCell::new(Vec2::new(1000.0, 900.0)));
        cam.follow(&player, FollowOptions::default());
        cam.update(1.0 / 60.0);
        assert_eq!(cam.position, Vec2::new(760.0, 580.0));
    }

    #[test]
    fn follow_is_clamped_to_bounds() {
        let mut cam = camera();
        let player = Rc::new(RefCell::new(Vec2::new(1000.0, 10.0)));
        cam.follow(
            &player,
            FollowOptions::default().with_bounds(Vec2::ZERO, Vec2::new(960.0, 2000.0)),
        );
        cam.update(1.0 / 60.0);
        assert_eq!(cam.position, Vec2::new(480.0, 0.0));
    }

    #[test]
    fn smoothing_is_normalised_to_sixty_hertz() {
        let mut cam = camera();
        let player = Rc::new(RefCell::new(Vec2::new(240.0 + 100.0, 320.0)));
        cam.follow(&player, FollowOptions::default().with_lerp(0.1));
        cam.update(1.0 / 60.0);
        assert_relative_eq!(cam.position.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(cam.position.y, 0.0);
    }

    #[test]
    fn unfollow_holds_position() {
        let mut cam = camera();
        let player = Rc::new(RefCell::new(Vec2::new(500.0, 500.0)));
        cam.follow(&player, FollowOptions::default());
        cam.update(0.016);
        let held = cam.position;

        cam.unfollow();
        player.borrow_mut().x = 9000.0;
        cam.update(0.016);
        assert_eq!(cam.position, held);
    }

    #[test]
    fn dropped_target_stops_following() {
        let mut cam = camera();
        let player = Rc::new(RefCell::new(Vec2::new(500.0, 500.0)));
        cam.follow(&player, FollowOptions::default());
        drop(player);
        cam.update(0.016);
        assert!(!cam.is_following());
        assert_eq!(cam.position, Vec2::ZERO);
    }

    #[test]
    fn shake_is_bounded_and_decays_to_zero() {
        let mut cam = camera();
        cam.shake(10.0, 0.5);

        for _ in 0..29 {
            cam.update(1.0 / 60.0);
            let bound = 10.0 * (cam.shake_remaining().max(0.0) / 0.5);
            let off = cam.shake_offset();
            assert!(off.x.abs() <= bound + 1e-4 && off.y.abs() <= bound + 1e-4);
        }

        for _ in 0..3 {
            cam.update(1.0 / 60.0);
        }
        assert!(cam.shake_remaining() <= 0.0);
        assert_eq!(cam.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn seeded_shake_is_repeatable() {
        let mut a = camera();
        let mut b = camera();
        a.shake(8.0, 1.0);
        b.shake(8.0, 1.0);
        a.update(0.1);
        b.update(0.1);
        assert_eq!(a.shake_offset(), b.shake_offset());
        assert_ne!(a.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn translation_rounds_and_negates() {
        let mut cam = camera();
        cam.position = Vec2::new(10.4, -3.6);
        assert_eq!(cam.translation(), Vec2::new(-10.0, 4.0));
    }

    #[test]
    fn translation_rounds_halves_upwards() {
        let mut cam = camera();
        cam.position = Vec2::new(-2.5, 2.5);
        assert_eq!(cam.translation(), Vec2::new(2.0, -3.0));
    }

    #[test]
    fn reset_returns_to_origin_and_unfollows() {
        let mut cam = camera();
        let player = Rc::new(RefCell::new(Vec2::new(500.0, 500.0)));
        cam.follow(&player, FollowOptions::default());
        cam.update(0.016);
        cam.reset();
        assert_eq!(cam.position, Vec2::ZERO);
        assert!(!cam.is_following());
        assert_eq!(cam.translation(), Vec2::ZERO);
    }

    #[test]
    fn reset_keeps_a_running_shake() {
        let mut cam = camera();
        cam.shake(5.0, 1.0);
        cam.update(0.1);
        cam.reset();
        assert_relative_eq!(cam.shake_remaining(), 0.9, epsilon = 1e-6);
        cam.update(0.1);
        assert_ne!(cam.shake_offset(), Vec2::ZERO);
    }
}
