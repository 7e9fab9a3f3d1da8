use crate::assets::Image;
use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::raster;
use super::surface::Surface;
use super::text::{FontSystem, TextStyle};

/// Per-call drawing options.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawOpts {
    /// Multiplies the colour's own alpha.
    pub alpha: f32,
    /// Outline colour; when set, shapes are stroked instead of filled.
    pub stroke: Option<Color>,
    pub line_width: f32,
    /// Mirror images horizontally inside their destination rect.
    pub flip_x: bool,
}

impl Default for DrawOpts {
    fn default() -> Self {
        Self { alpha: 1.0, stroke: None, line_width: 1.0, flip_x: false }
    }
}

impl DrawOpts {
    pub fn alpha(alpha: f32) -> Self {
        Self { alpha, ..Self::default() }
    }

    pub fn stroke(color: Color, line_width: f32) -> Self {
        Self { stroke: Some(color), line_width, ..Self::default() }
    }

    pub fn flipped() -> Self {
        Self { flip_x: true, ..Self::default() }
    }
}

/// Drawing API handed to scenes.
///
/// Plain methods work in world space and are shifted by the camera translation;
/// `*_screen` methods draw in fixed overlay space.
pub struct Canvas<'a> {
    surface: &'a mut Surface,
    fonts: &'a FontSystem,
    translation: Vec2,
}

impl<'a> Canvas<'a> {
    pub fn new(surface: &'a mut Surface, fonts: &'a FontSystem, translation: Vec2) -> Self {
        Self { surface, fonts, translation }
    }

    /// Canvas with no camera translation.
    pub fn screen(surface: &'a mut Surface, fonts: &'a FontSystem) -> Self {
        Self::new(surface, fonts, Vec2::ZERO)
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.surface.width() as f32, self.surface.height() as f32)
    }

    pub fn fonts(&self) -> &FontSystem {
        self.fonts
    }

    // world space

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, opts: DrawOpts) {
        self.rect_at(self.translation, Rect::new(x, y, w, h), color, opts);
    }

    pub fn circle(&mut self, x: f32, y: f32, r: f32, color: Color, opts: DrawOpts) {
        self.circle_at(self.translation, Vec2::new(x, y), r, color, opts);
    }

    /// Draws `image` at `(x, y)`, stretched to `size` when given.
    pub fn image(&mut self, image: &Image, x: f32, y: f32, size: Option<Vec2>, opts: DrawOpts) {
        self.image_at(self.translation, image, x, y, size, opts);
    }

    /// Draws cell `frame` (0-based, row-major) of a sprite sheet laid out on a
    /// `frame_w` x `frame_h` grid.
    #[allow(clippy::too_many_arguments)]
    pub fn sprite_frame(
        &mut self,
        image: &Image,
        frame: u32,
        frame_w: u32,
        frame_h: u32,
        x: f32,
        y: f32,
        size: Option<Vec2>,
        opts: DrawOpts,
    ) {
        if frame_w == 0 || frame_h == 0 {
            return;
        }
        let cols = (image.width() / frame_w).max(1);
        // a cell whose offset does not fit in u32 is far off any sheet
        let (Some(sx), Some(sy)) = ((frame % cols).checked_mul(frame_w), (frame / cols).checked_mul(frame_h)) else {
            return;
        };
        let src = Rect::new(sx as f32, sy as f32, frame_w as f32, frame_h as f32);
        let size = size.unwrap_or(Vec2::new(frame_w as f32, frame_h as f32));
        let dst = Rect::new(x, y, size.x, size.y).translated(self.translation);
        raster::blit(self.surface, image, src, dst, opts.alpha, opts.flip_x);
    }

    pub fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.fonts.draw(self.surface, text, Vec2::new(x, y) + self.translation, style);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, width: f32) {
        self.line_at(self.translation, Vec2::new(x1, y1), Vec2::new(x2, y2), color, width);
    }

    // screen space

    pub fn rect_screen(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, opts: DrawOpts) {
        self.rect_at(Vec2::ZERO, Rect::new(x, y, w, h), color, opts);
    }

    pub fn circle_screen(&mut self, x: f32, y: f32, r: f32, color: Color, opts: DrawOpts) {
        self.circle_at(Vec2::ZERO, Vec2::new(x, y), r, color, opts);
    }

    pub fn image_screen(&mut self, image: &Image, x: f32, y: f32, size: Option<Vec2>, opts: DrawOpts) {
        self.image_at(Vec2::ZERO, image, x, y, size, opts);
    }

    pub fn text_screen(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.fonts.draw(self.surface, text, Vec2::new(x, y), style);
    }

    pub fn line_screen(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, width: f32) {
        self.line_at(Vec2::ZERO, Vec2::new(x1, y1), Vec2::new(x2, y2), color, width);
    }

    fn rect_at(&mut self, offset: Vec2, rect: Rect, color: Color, opts: DrawOpts) {
        let rect = rect.translated(offset);
        match opts.stroke {
            Some(stroke) => raster::stroke_rect(
                self.surface,
                rect,
                opts.line_width,
                stroke.to_rgba8(),
                opts.alpha,
            ),
            None => raster::fill_rect(self.surface, rect, color.to_rgba8(), opts.alpha),
        }
    }

    fn circle_at(&mut self, offset: Vec2, center: Vec2, r: f32, color: Color, opts: DrawOpts) {
        let center = center + offset;
        match opts.stroke {
            Some(stroke) => raster::stroke_circle(
                self.surface,
                center,
                r,
                opts.line_width,
                stroke.to_rgba8(),
                opts.alpha,
            ),
            None => raster::fill_circle(self.surface, center, r, color.to_rgba8(), opts.alpha),
        }
    }

    fn image_at(&mut self, offset: Vec2, image: &Image, x: f32, y: f32, size: Option<Vec2>, opts: DrawOpts) {
        let (w, h) = (image.width() as f32, image.height() as f32);
        let size = size.unwrap_or(Vec2::new(w, h));
        let dst = Rect::new(x, y, size.x, size.y).translated(offset);
        raster::blit(self.surface, image, Rect::new(0.0, 0.0, w, h), dst, opts.alpha, opts.flip_x);
    }

    fn line_at(&mut self, offset: Vec2, a: Vec2, b: Vec2, color: Color, width: f32) {
        raster::line(self.surface, a + offset, b + offset, width, color.to_rgba8(), 1.0);
    }
}
