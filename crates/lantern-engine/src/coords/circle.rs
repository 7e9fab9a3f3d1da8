use super::Vec2;

/// Circle in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    #[inline]
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { center: Vec2::new(x, y), radius }
    }
}
