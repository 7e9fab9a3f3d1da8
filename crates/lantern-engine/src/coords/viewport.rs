/// Size of a drawable area.
///
/// Used both for the fixed logical resolution of the game surface and for the
/// physical size of the host window it is letterboxed into.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width / self.height
    }

    /// `true` when the area is at least as tall as it is wide.
    #[inline]
    pub fn is_portrait(self) -> bool {
        self.height >= self.width
    }
}
