use crate::coords::Vec2;
use crate::error::FontLoadError;
use crate::paint::Color;

use super::raster;
use super::surface::Surface;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Which line the `y` coordinate of a text draw refers to.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Baseline {
    #[default]
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    /// Pixel size.
    pub size: f32,
    pub align: TextAlign,
    pub baseline: Baseline,
    pub alpha: f32,
    /// Drawn one pixel down-right beneath the text.
    pub shadow: Option<Color>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            size: 24.0,
            align: TextAlign::Left,
            baseline: Baseline::Top,
            alpha: 1.0,
            shadow: None,
        }
    }
}

impl TextStyle {
    pub fn sized(size: f32) -> Self {
        Self { size, ..Self::default() }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_shadow(mut self, shadow: Color) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn centered(self) -> Self {
        self.with_align(TextAlign::Center).with_baseline(Baseline::Middle)
    }
}

/// Text rasterisation for the software surface.
///
/// Uses a loaded TrueType/OpenType font when one is available and otherwise a
/// built-in 3x5 pixel font (uppercase letters, digits, common punctuation).
#[derive(Default)]
pub struct FontSystem {
    font: Option<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a font from raw bytes and makes it the active face.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<(), FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        self.font = Some(font);
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// `(ascent, descent)` in pixels; descent is zero or negative.
    fn line_metrics(&self, size: f32) -> (f32, f32) {
        match &self.font {
            Some(font) => font
                .horizontal_line_metrics(size)
                .map(|m| (m.ascent, m.descent))
                .unwrap_or((size * 0.8, -size * 0.2)),
            None => (5.0 * builtin_scale(size) as f32, 0.0),
        }
    }

    /// Width and line height of `text` at `size`.
    #[must_use]
    pub fn measure(&self, text: &str, size: f32) -> Vec2 {
        let (ascent, descent) = self.line_metrics(size);
        let width = match &self.font {
            Some(font) => text.chars().map(|c| font.metrics(c, size).advance_width).sum(),
            None => {
                let n = text.chars().count() as f32;
                let s = builtin_scale(size) as f32;
                if n > 0.0 { n * 4.0 * s - s } else { 0.0 }
            }
        };
        Vec2::new(width, ascent - descent)
    }

    pub fn draw(&self, surface: &mut Surface, text: &str, pos: Vec2, style: &TextStyle) {
        let size = style.size.max(1.0);
        let extent = self.measure(text, size);
        let (ascent, _) = self.line_metrics(size);

        let x = match style.align {
            TextAlign::Left => pos.x,
            TextAlign::Center => pos.x - extent.x * 0.5,
            TextAlign::Right => pos.x - extent.x,
        };
        let top = match style.baseline {
            Baseline::Top => pos.y,
            Baseline::Middle => pos.y - extent.y * 0.5,
            Baseline::Bottom => pos.y - extent.y,
            Baseline::Alphabetic => pos.y - ascent,
        };
        let origin = Vec2::new(x, top);

        if let Some(shadow) = style.shadow {
            self.render(surface, text, origin + Vec2::splat(1.0), size, shadow, style.alpha);
        }
        self.render(surface, text, origin, size, style.color, style.alpha);
    }

    fn render(&self, surface: &mut Surface, text: &str, top_left: Vec2, size: f32, color: Color, alpha: f32) {
        let rgba = color.to_rgba8();
        let alpha = alpha * color.a;
        let rgba = [rgba[0], rgba[1], rgba[2], 255];

        match &self.font {
            Some(font) => {
                let baseline = top_left.y + self.line_metrics(size).0;
                let mut pen = top_left.x;
                for c in text.chars() {
                    let (m, bitmap) = font.rasterize(c, size);
                    let gx = (pen + m.xmin as f32).round() as i32;
                    let gy = (baseline - m.ymin as f32 - m.height as f32).round() as i32;
                    raster::mask(surface, (gx, gy), (m.width, m.height), &bitmap, rgba, alpha);
                    pen += m.advance_width;
                }
            }
            None => {
                let s = builtin_scale(size);
                let mut pen = top_left.x.round() as i32;
                let top = top_left.y.round() as i32;
                for c in text.chars() {
                    if let Some(rows) = builtin_glyph(c) {
                        for (ry, bits) in rows.iter().enumerate() {
                            for rx in 0..3 {
                                if bits & (0b100 >> rx) == 0 {
                                    continue;
                                }
                                for dy in 0..s {
                                    for dx in 0..s {
                                        surface.blend(
                                            pen + rx * s + dx,
                                            top + ry as i32 * s + dy,
                                            rgba,
                                            alpha,
                                        );
                                    }
                                }
                            }
                        }
                    }
                    pen += 4 * s;
                }
            }
        }
    }
}

/// Pixel size of one built-in font cell.
fn builtin_scale(size: f32) -> i32 {
    ((size / 6.0).floor() as i32).max(1)
}

/// Five rows, three bits each (MSB = left column).
fn builtin_glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b110, 0b001, 0b010, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_measure_scales_with_size() {
        let fonts = FontSystem::new();
        // 6 px cells: 3 glyphs * 4 columns - 1 trailing gap
        assert_eq!(fonts.measure("FPS", 6.0), Vec2::new(11.0, 5.0));
        assert_eq!(fonts.measure("FPS", 12.0), Vec2::new(22.0, 10.0));
        assert_eq!(fonts.measure("", 12.0).x, 0.0);
    }

    #[test]
    fn builtin_draw_lights_glyph_pixels() {
        let fonts = FontSystem::new();
        let mut s = Surface::new(16, 8);
        fonts.draw(&mut s, "I", Vec2::new(0.0, 0.0), &TextStyle::sized(6.0));
        // top bar of 'I' is lit, the gap column after it is not
        assert!(s.pixel(0, 0).is_some_and(|p| p.a > 0));
        assert!(s.pixel(2, 0).is_some_and(|p| p.a > 0));
        assert!(s.pixel(3, 0).is_some_and(|p| p.a == 0));
        assert!(s.pixel(0, 1).is_some_and(|p| p.a == 0));
    }

    #[test]
    fn centered_text_is_shifted_by_half_its_extent() {
        let fonts = FontSystem::new();
        let mut s = Surface::new(32, 16);
        fonts.draw(&mut s, "I", Vec2::new(16.0, 8.0), &TextStyle::sized(6.0).centered());
        // "I" is 3x5 at scale 1: centred at (16, 8) -> x 14.5..17.5, y 5.5..10.5
        assert!(s.pixel(15, 6).is_some_and(|p| p.a > 0));
        assert!(s.pixel(0, 0).is_some_and(|p| p.a == 0));
    }

    #[test]
    fn bad_font_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"definitely not a font").is_err());
        assert!(!fonts.has_font());
    }
}
