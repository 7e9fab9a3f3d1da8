use std::f32::consts::PI;

/// Remaps linear progress `t in [0, 1]` to eased progress.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-in.
    EaseIn,
    /// Quadratic ease-out.
    EaseOut,
    /// Quadratic ease-in-out.
    EaseInOut,
    /// Four-segment parabolic bounce.
    Bounce,
    /// Exponentially decaying sinusoid; overshoots past 1.
    Elastic,
    Custom(fn(f32) -> f32),
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::Bounce => bounce(t),
            Easing::Elastic => elastic(t),
            Easing::Custom(f) => f(t),
        }
    }

    /// Looks a curve up by name. Unknown names fall back to linear.
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear" => Easing::Linear,
            "easeIn" => Easing::EaseIn,
            "easeOut" => Easing::EaseOut,
            "easeInOut" => Easing::EaseInOut,
            "bounce" => Easing::Bounce,
            "elastic" => Easing::Elastic,
            other => {
                log::warn!("unknown easing '{other}', using linear");
                Easing::Linear
            }
        }
    }
}

impl From<&str> for Easing {
    fn from(name: &str) -> Self {
        Easing::from_name(name)
    }
}

const N: f32 = 7.5625;
const D: f32 = 2.75;

fn bounce(t: f32) -> f32 {
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

fn elastic(t: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    -(2f32.powf(10.0 * (t - 1.0))) * ((t - 1.1) * 5.0 * PI).sin()
}
