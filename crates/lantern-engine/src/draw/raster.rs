//! Scanline fills for the software surface.
//!
//! Rect fills sample pixel centres. Circles and lines get a one-pixel coverage ramp on
//! their edges.

use crate::assets::Image;
use crate::coords::{Rect, Vec2};

use super::surface::Surface;

/// Pixel-centre span `[start, end)` covered by `[a, b)`.
#[inline]
fn span(a: f32, b: f32) -> (i32, i32) {
    ((a - 0.5).ceil() as i32, (b - 0.5).ceil() as i32)
}

fn clip(surface: &Surface, x0: i32, x1: i32, y0: i32, y1: i32) -> (i32, i32, i32, i32) {
    (
        x0.max(0),
        x1.min(surface.width() as i32),
        y0.max(0),
        y1.min(surface.height() as i32),
    )
}

pub fn fill_rect(surface: &mut Surface, rect: Rect, color: [u8; 4], alpha: f32) {
    let r = rect.normalized();
    let (x0, x1) = span(r.origin.x, r.max().x);
    let (y0, y1) = span(r.origin.y, r.max().y);
    let (x0, x1, y0, y1) = clip(surface, x0, x1, y0, y1);
    for y in y0..y1 {
        for x in x0..x1 {
            surface.blend(x, y, color, alpha);
        }
    }
}

/// Outline centred on the rect edge.
pub fn stroke_rect(surface: &mut Surface, rect: Rect, width: f32, color: [u8; 4], alpha: f32) {
    let r = rect.normalized();
    let h = width.max(0.0) * 0.5;
    let outer = Rect::from_min_max(r.origin - Vec2::splat(h), r.max() + Vec2::splat(h));
    let inner_h = (r.size.y - 2.0 * h).max(0.0);

    // top, bottom, then the two sides between them
    fill_rect(surface, Rect::new(outer.origin.x, outer.origin.y, outer.size.x, 2.0 * h), color, alpha);
    fill_rect(surface, Rect::new(outer.origin.x, r.max().y - h, outer.size.x, 2.0 * h), color, alpha);
    fill_rect(surface, Rect::new(outer.origin.x, r.origin.y + h, 2.0 * h, inner_h), color, alpha);
    fill_rect(surface, Rect::new(r.max().x - h, r.origin.y + h, 2.0 * h, inner_h), color, alpha);
}

fn shade(surface: &mut Surface, min: Vec2, max: Vec2, color: [u8; 4], alpha: f32, coverage: impl Fn(Vec2) -> f32) {
    // clamp in float space first; far-off coordinates would otherwise saturate the cast
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let x0 = min.x.floor().clamp(0.0, w) as i32;
    let x1 = (max.x.ceil() + 1.0).clamp(0.0, w) as i32;
    let y0 = min.y.floor().clamp(0.0, h) as i32;
    let y1 = (max.y.ceil() + 1.0).clamp(0.0, h) as i32;
    for y in y0..y1 {
        for x in x0..x1 {
            let c = coverage(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            if c > 0.0 {
                surface.blend(x, y, color, alpha * c);
            }
        }
    }
}

pub fn fill_circle(surface: &mut Surface, center: Vec2, radius: f32, color: [u8; 4], alpha: f32) {
    if radius <= 0.0 {
        return;
    }
    let ext = Vec2::splat(radius + 1.0);
    shade(surface, center - ext, center + ext, color, alpha, |p| {
        (radius - (p - center).length() + 0.5).clamp(0.0, 1.0)
    });
}

pub fn stroke_circle(surface: &mut Surface, center: Vec2, radius: f32, width: f32, color: [u8; 4], alpha: f32) {
    let h = width.max(0.0) * 0.5;
    let ext = Vec2::splat(radius + h + 1.0);
    shade(surface, center - ext, center + ext, color, alpha, |p| {
        (h - ((p - center).length() - radius).abs() + 0.5).clamp(0.0, 1.0)
    });
}

pub fn line(surface: &mut Surface, a: Vec2, b: Vec2, width: f32, color: [u8; 4], alpha: f32) {
    let h = width.max(0.0) * 0.5;
    let min = Vec2::new(a.x.min(b.x), a.y.min(b.y)) - Vec2::splat(h + 1.0);
    let max = Vec2::new(a.x.max(b.x), a.y.max(b.y)) + Vec2::splat(h + 1.0);
    let ab = b - a;
    let len2 = ab.length_squared();

    shade(surface, min, max, color, alpha, |p| {
        let ap = p - a;
        let t = if len2 > 0.0 {
            ((ap.x * ab.x + ap.y * ab.y) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let d = (p - (a + ab * t)).length();
        (h - d + 0.5).clamp(0.0, 1.0)
    });
}

/// Nearest-neighbour blit of the `src` region of `image` into `dst`.
pub fn blit(surface: &mut Surface, image: &Image, src: Rect, dst: Rect, alpha: f32, flip_x: bool) {
    if dst.size.x == 0.0 || dst.size.y == 0.0 || src.is_empty() {
        return;
    }
    let d = dst.normalized();
    let (x0, x1) = span(d.origin.x, d.max().x);
    let (y0, y1) = span(d.origin.y, d.max().y);
    let (x0, x1, y0, y1) = clip(surface, x0, x1, y0, y1);

    let (iw, ih) = (image.width(), image.height());
    if iw == 0 || ih == 0 {
        return;
    }

    for y in y0..y1 {
        let v = ((y as f32 + 0.5 - d.origin.y) / d.size.y).clamp(0.0, 1.0);
        let sy = (src.origin.y + v * src.size.y).floor().min(src.max().y - 1.0) as i64;
        if sy < 0 || sy >= ih as i64 {
            continue;
        }
        for x in x0..x1 {
            let mut u = ((x as f32 + 0.5 - d.origin.x) / d.size.x).clamp(0.0, 1.0);
            if flip_x {
                u = 1.0 - u;
            }
            let sx = (src.origin.x + u * src.size.x).floor().min(src.max().x - 1.0) as i64;
            if sx < 0 || sx >= iw as i64 {
                continue;
            }
            surface.blend(x, y, image.pixel(sx as u32, sy as u32), alpha);
        }
    }
}

/// Blends an 8-bit coverage mask (glyph bitmap) with its top-left at `(x, y)`.
pub fn mask(surface: &mut Surface, (x, y): (i32, i32), (w, h): (usize, usize), coverage: &[u8], color: [u8; 4], alpha: f32) {
    for row in 0..h {
        for col in 0..w {
            let c = coverage.get(row * w + col).copied().unwrap_or(0);
            if c > 0 {
                surface.blend(x + col as i32, y + row as i32, color, alpha * c as f32 / 255.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::surface::Rgba8;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn lit(s: &Surface, x: u32, y: u32) -> bool {
        s.pixel(x, y).is_some_and(|p| p.r > 0)
    }

    #[test]
    fn fill_rect_covers_pixel_centres_only() {
        let mut s = Surface::new(8, 8);
        fill_rect(&mut s, Rect::new(1.0, 1.0, 2.0, 3.0), RED, 1.0);
        assert!(lit(&s, 1, 1) && lit(&s, 2, 3));
        assert!(!lit(&s, 3, 1) && !lit(&s, 1, 4) && !lit(&s, 0, 0));
    }

    #[test]
    fn shapes_are_clipped_to_the_surface() {
        let mut s = Surface::new(4, 4);
        fill_rect(&mut s, Rect::new(-10.0, -10.0, 100.0, 100.0), RED, 1.0);
        fill_circle(&mut s, Vec2::new(-50.0, 2.0), 3.0, RED, 1.0);
        line(&mut s, Vec2::new(-5.0, -5.0), Vec2::new(50.0, 50.0), 1.0, RED, 1.0);
        assert!(lit(&s, 3, 3));
    }

    #[test]
    fn circle_centre_is_full_and_outside_is_empty() {
        let mut s = Surface::new(16, 16);
        fill_circle(&mut s, Vec2::new(8.0, 8.0), 4.0, RED, 1.0);
        assert_eq!(s.pixel(8, 8), Some(Rgba8 { r: 255, g: 0, b: 0, a: 255 }));
        assert!(!lit(&s, 0, 0));
        assert!(!lit(&s, 14, 8));
    }

    #[test]
    fn stroke_rect_leaves_interior_untouched() {
        let mut s = Surface::new(16, 16);
        stroke_rect(&mut s, Rect::new(2.0, 2.0, 10.0, 10.0), 2.0, RED, 1.0);
        assert!(lit(&s, 1, 1) && lit(&s, 2, 6) && lit(&s, 12, 12));
        assert!(!lit(&s, 6, 6));
    }

    #[test]
    fn far_off_endpoints_still_draw_the_visible_part() {
        let mut s = Surface::new(8, 8);
        line(&mut s, Vec2::new(0.0, 4.0), Vec2::new(1e10, 4.0), 2.0, RED, 1.0);
        assert!(lit(&s, 3, 4) && lit(&s, 7, 4));
        assert!(!lit(&s, 3, 0));

        let mut s = Surface::new(8, 8);
        fill_circle(&mut s, Vec2::new(4.0, 4.0), 3e9, RED, 1.0);
        assert!(lit(&s, 0, 0) && lit(&s, 7, 7));
    }

    #[test]
    fn blit_stays_inside_the_source_rows() {
        // red row over blue row; a source rect ending mid-way into the blue row
        let img = Image::from_rgba8(1, 2, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
        let mut s = Surface::new(1, 4);
        blit(&mut s, &img, Rect::new(0.0, 0.5, 1.0, 1.0), Rect::new(0.0, 0.0, 1.0, 4.0), 1.0, false);
        for y in 0..4 {
            assert_eq!(s.pixel(0, y).map(|p| (p.r, p.b)), Some((255, 0)));
        }
    }

    #[test]
    fn blit_flips_horizontally() {
        let img = Image::from_rgba8(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
        let mut s = Surface::new(2, 1);
        blit(&mut s, &img, Rect::new(0.0, 0.0, 2.0, 1.0), Rect::new(0.0, 0.0, 2.0, 1.0), 1.0, true);
        assert_eq!(s.pixel(0, 0).map(|p| p.b), Some(255));
        assert_eq!(s.pixel(1, 0).map(|p| p.r), Some(255));
    }
}
