//! Engine-drawn overlays. All of them work in screen space.

use crate::config::Orientation;
use crate::paint::Color;

use super::canvas::{Canvas, DrawOpts};
use super::text::{Baseline, TextAlign, TextStyle};

const FPS_GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
const LOADING_BACKDROP: Color = Color::rgb(26.0 / 255.0, 26.0 / 255.0, 46.0 / 255.0);
const LOADING_TRACK: Color = Color::rgb(0.2, 0.2, 0.2);
const LOADING_FILL: Color = Color::rgb(68.0 / 255.0, 170.0 / 255.0, 1.0);

/// Top-left `FPS:<n>` readout on a translucent 64x20 box.
pub fn fps_readout(canvas: &mut Canvas<'_>, fps: f32) {
    canvas.rect_screen(0.0, 0.0, 64.0, 20.0, Color::BLACK.with_alpha(0.5), DrawOpts::default());
    let style = TextStyle::sized(12.0).with_color(FPS_GREEN);
    canvas.text_screen(&format!("FPS:{}", fps.round() as i64), 4.0, 4.0, &style);
}

/// Dims everything and asks the player to rotate the device.
pub fn orientation_overlay(canvas: &mut Canvas<'_>, required: Orientation) {
    let size = canvas.size();
    canvas.rect_screen(0.0, 0.0, size.x, size.y, Color::BLACK.with_alpha(0.85), DrawOpts::default());

    let label = match required {
        Orientation::Landscape => "ROTATE TO LANDSCAPE",
        _ => "ROTATE TO PORTRAIT",
    };
    canvas.text_screen(label, size.x * 0.5, size.y * 0.5, &TextStyle::sized(18.0).centered());
}

/// Centred progress bar: 60% of the width, 20 px tall.
pub fn loading_bar(canvas: &mut Canvas<'_>, progress: f32) {
    let size = canvas.size();
    let bw = (size.x * 0.6).floor();
    let bh = 20.0;
    let bx = ((size.x - bw) / 2.0).floor();
    let by = (size.y / 2.0 - bh / 2.0).floor();

    canvas.rect_screen(0.0, 0.0, size.x, size.y, LOADING_BACKDROP, DrawOpts::default());
    canvas.rect_screen(bx, by, bw, bh, LOADING_TRACK, DrawOpts::default());
    canvas.rect_screen(bx, by, (bw * progress.clamp(0.0, 1.0)).floor(), bh, LOADING_FILL, DrawOpts::default());

    let style = TextStyle::sized(16.0)
        .with_align(TextAlign::Center)
        .with_baseline(Baseline::Middle);
    canvas.text_screen("LOADING", size.x * 0.5, by - 14.0, &style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{FontSystem, Surface};

    #[test]
    fn loading_bar_fill_tracks_progress() {
        let fonts = FontSystem::new();
        let mut s = Surface::new(100, 100);
        loading_bar(&mut Canvas::screen(&mut s, &fonts), 0.5);

        // bar spans x 20..80 at y 40..60; half filled
        let fill = s.pixel(30, 50).unwrap();
        let track = s.pixel(70, 50).unwrap();
        assert_eq!((fill.r, fill.g, fill.b), (68, 170, 255));
        assert_eq!((track.r, track.g, track.b), (51, 51, 51));
    }

    #[test]
    fn fps_box_is_drawn_top_left() {
        let fonts = FontSystem::new();
        let mut s = Surface::new(100, 100);
        s.clear(Color::WHITE);
        fps_readout(&mut Canvas::screen(&mut s, &fonts), 59.6);
        let corner = s.pixel(63, 19).unwrap();
        assert!(corner.r < 255);
        assert_eq!(s.pixel(64, 20).map(|p| p.r), Some(255));
    }
}
