use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::paint::Color;

/// Orientation the host viewport must satisfy for the simulation to run.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Orientation {
    #[default]
    Any,
    Portrait,
    Landscape,
}

impl Orientation {
    /// Whether a `width`x`height` viewport satisfies this requirement.
    pub fn accepts(self, width: u32, height: u32) -> bool {
        match self {
            Orientation::Any => true,
            Orientation::Portrait => height >= width,
            Orientation::Landscape => width > height,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Any => "any",
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(Orientation::Any),
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(format!("unknown orientation '{other}'")),
        }
    }
}

/// Engine construction options. Immutable once handed to the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window title; identifies the render target on desktop hosts.
    pub title: String,

    /// Logical resolution in pixels.
    pub width: u32,
    pub height: u32,

    pub orientation: Orientation,
    pub background: Color,

    /// Nearest-neighbour sampling when scaling the surface up.
    pub pixel_perfect: bool,
    pub show_fps: bool,

    /// Upper bound on the delta handed to scene update, in seconds.
    pub max_delta_time: f32,

    /// Press-then-release on the pointer channel shorter than this counts as a tap.
    pub tap_threshold: Duration,

    /// Relative asset urls resolve against this directory.
    pub asset_root: PathBuf,

    /// Seed for the shared random source; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "lantern".to_string(),
            width: 480,
            height: 640,
            orientation: Orientation::Any,
            background: Color::BLACK,
            pixel_perfect: false,
            show_fps: false,
            max_delta_time: 0.05,
            tap_threshold: Duration::from_millis(300),
            asset_root: PathBuf::from("."),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_pixel_perfect(mut self, on: bool) -> Self {
        self.pixel_perfect = on;
        self
    }

    pub fn with_show_fps(mut self, on: bool) -> Self {
        self.show_fps = on;
        self
    }

    pub fn with_max_delta_time(mut self, seconds: f32) -> Self {
        self.max_delta_time = seconds.max(0.0);
        self
    }

    pub fn with_tap_threshold(mut self, threshold: Duration) -> Self {
        self.tap_threshold = threshold;
        self
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
