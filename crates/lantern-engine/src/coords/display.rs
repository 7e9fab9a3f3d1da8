use super::{Vec2, Viewport};

/// Placement of the logical surface inside the physical viewport.
///
/// `offset` and `size` are whole physical pixels; `scale` is physical pixels per
/// logical pixel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Letterbox {
    pub offset: Vec2,
    pub size: Vec2,
    pub scale: f32,
}

/// Keeps a fixed logical resolution and fits it, aspect-preserving, into whatever
/// physical viewport the host provides.
///
/// The logical coordinate system never changes; only the visual scale and centring
/// offset are recomputed on resize.
#[derive(Debug, Clone)]
pub struct DisplayAdapter {
    logical: Viewport,
    physical: Viewport,
    fit: Letterbox,
}

impl DisplayAdapter {
    /// Creates an adapter whose viewport initially matches the logical size (scale 1).
    pub fn new(width: u32, height: u32) -> Self {
        let logical = Viewport::new(width.max(1) as f32, height.max(1) as f32);
        let mut adapter = Self {
            logical,
            physical: logical,
            fit: Letterbox {
                offset: Vec2::ZERO,
                size: Vec2::new(logical.width, logical.height),
                scale: 1.0,
            },
        };
        adapter.refit();
        adapter
    }

    /// Recomputes the fit for a new physical viewport. Zero-sized viewports (minimised
    /// windows) keep the previous fit.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::trace!("ignoring zero-sized viewport {width}x{height}");
            return;
        }
        self.physical = Viewport::new(width as f32, height as f32);
        self.refit();
    }

    fn refit(&mut self) {
        let aspect = self.logical.aspect();
        let (sw, sh) = (self.physical.width, self.physical.height);

        let (dw, dh) = if sw / sh > aspect {
            ((sh * aspect).floor(), sh)
        } else {
            (sw, (sw / aspect).floor())
        };

        self.fit = Letterbox {
            offset: Vec2::new(((sw - dw) / 2.0).floor(), ((sh - dh) / 2.0).floor()),
            size: Vec2::new(dw, dh),
            scale: dw / self.logical.width,
        };
    }

    #[inline]
    pub fn fit(&self) -> Letterbox {
        self.fit
    }

    #[inline]
    pub fn logical_size(&self) -> Viewport {
        self.logical
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.physical
    }

    /// Maps a physical pointer position into logical coordinates.
    ///
    /// Points outside the letterboxed area map outside `[0, logical)`; they are not
    /// clamped.
    pub fn to_logical(&self, physical: Vec2) -> Vec2 {
        if self.fit.size.x <= 0.0 || self.fit.size.y <= 0.0 {
            return physical;
        }
        let rel = physical - self.fit.offset;
        Vec2::new(
            rel.x * (self.logical.width / self.fit.size.x),
            rel.y * (self.logical.height / self.fit.size.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wide_viewport_pillarboxes() {
        let mut d = DisplayAdapter::new(480, 640);
        d.resize(1920, 1080);
        let fit = d.fit();
        assert_eq!(fit.size, Vec2::new(810.0, 1080.0));
        assert_eq!(fit.offset, Vec2::new(555.0, 0.0));
        assert_relative_eq!(fit.scale, 810.0 / 480.0);
    }

    #[test]
    fn tall_viewport_letterboxes() {
        let mut d = DisplayAdapter::new(480, 640);
        d.resize(480, 1000);
        let fit = d.fit();
        assert_eq!(fit.size, Vec2::new(480.0, 640.0));
        assert_eq!(fit.offset, Vec2::new(0.0, 180.0));
    }

    #[test]
    fn to_logical_inverts_the_fit() {
        let mut d = DisplayAdapter::new(480, 640);
        d.resize(960, 1280);
        let p = d.to_logical(Vec2::new(480.0, 640.0));
        assert_relative_eq!(p.x, 240.0);
        assert_relative_eq!(p.y, 320.0);

        d.resize(1920, 1080);
        let p = d.to_logical(Vec2::new(555.0, 0.0));
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut d = DisplayAdapter::new(480, 640);
        d.resize(960, 1280);
        let before = d.fit();
        d.resize(0, 700);
        assert_eq!(d.fit(), before);
        assert_eq!(d.viewport(), Viewport::new(960.0, 1280.0));
    }
}
