use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

/// One RGBA8 pixel (sRGB, straight alpha).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// CPU render target at the fixed logical resolution.
///
/// Everything a frame draws lands here; the presenter uploads it as one texture.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            pixels: vec![Rgba8::default(); (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        let px = Rgba8::from(color.to_rgba8());
        self.pixels.fill(px);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Raw bytes, row-major, 4 bytes per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Source-over blend of `src` (straight alpha) scaled by `coverage`.
    /// Out-of-bounds writes are dropped.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, src: [u8; 4], coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let a = (src[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }

        let idx = (y as u32 * self.width + x as u32) as usize;
        let dst = &mut self.pixels[idx];
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        let out_a = a + (dst.a as f32 / 255.0) * (1.0 - a);

        *dst = Rgba8 {
            r: mix(src[0], dst.r),
            g: mix(src[1], dst.g),
            b: mix(src[2], dst.b),
            a: (out_a * 255.0).round() as u8,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_and_blend() {
        let mut s = Surface::new(2, 2);
        s.clear(Color::BLACK);
        s.blend(0, 0, [255, 255, 255, 255], 0.5);
        s.blend(5, 5, [255, 255, 255, 255], 1.0);

        assert_eq!(s.pixel(0, 0), Some(Rgba8 { r: 128, g: 128, b: 128, a: 255 }));
        assert_eq!(s.pixel(1, 1), Some(Rgba8 { r: 0, g: 0, b: 0, a: 255 }));
        assert_eq!(s.pixel(2, 0), None);
        assert_eq!(s.as_bytes().len(), 16);
    }
}
