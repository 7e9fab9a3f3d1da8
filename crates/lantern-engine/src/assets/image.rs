use std::sync::Arc;

use image::RgbaImage;

/// Decoded RGBA8 image, cheap to clone.
#[derive(Debug, Clone)]
pub struct Image(Arc<RgbaImage>);

impl Image {
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        Ok(Self(Arc::new(image::load_from_memory(bytes)?.to_rgba8())))
    }

    /// Wraps raw straight-alpha RGBA8 pixels. `None` when the buffer size does not
    /// match `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(|img| Self(Arc::new(img)))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.0.get_pixel(x, y).0
    }
}
