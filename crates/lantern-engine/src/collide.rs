//! Stateless overlap predicates over axis-aligned boxes and circles.
//!
//! Every test is strict: shapes that only touch (shared edge, tangent circles) do not
//! collide.

use crate::coords::{Circle, Rect, Vec2};

/// Axis-aligned box overlap.
#[inline]
pub fn rect_rect(a: Rect, b: Rect) -> bool {
    a.origin.x < b.origin.x + b.size.x
        && a.origin.x + a.size.x > b.origin.x
        && a.origin.y < b.origin.y + b.size.y
        && a.origin.y + a.size.y > b.origin.y
}

/// Overlap extents `(ox, oy)` when both are positive.
pub fn rect_rect_overlap(a: Rect, b: Rect) -> Option<Vec2> {
    let ox = (a.origin.x + a.size.x).min(b.origin.x + b.size.x) - a.origin.x.max(b.origin.x);
    let oy = (a.origin.y + a.size.y).min(b.origin.y + b.size.y) - a.origin.y.max(b.origin.y);
    (ox > 0.0 && oy > 0.0).then_some(Vec2::new(ox, oy))
}

#[inline]
pub fn circle_circle(a: Circle, b: Circle) -> bool {
    let r = a.radius + b.radius;
    (a.center - b.center).length_squared() < r * r
}

/// Nearest point of the box to the circle centre, compared against the radius.
#[inline]
pub fn circle_rect(c: Circle, r: Rect) -> bool {
    let nearest = Vec2::new(
        c.center.x.max(r.origin.x).min(r.origin.x + r.size.x),
        c.center.y.max(r.origin.y).min(r.origin.y + r.size.y),
    );
    (c.center - nearest).length_squared() < c.radius * c.radius
}
