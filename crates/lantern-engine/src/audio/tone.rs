use std::f32::consts::{FRAC_PI_2, TAU};
use std::str::FromStr;
use std::time::Duration;

/// Oscillator shape.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// One sample at `phase` in `[0, 1)`, amplitude `[-1, 1]`.
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 { 1.0 } else { -1.0 }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

impl FromStr for Waveform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sine" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "sawtooth" => Ok(Waveform::Sawtooth),
            "triangle" => Ok(Waveform::Triangle),
            other => Err(format!("unknown waveform '{other}'")),
        }
    }
}

/// A single enveloped oscillator voice.
///
/// Times are seconds. The envelope ramps linearly from 0 to `volume` over `attack`,
/// holds, then ramps back to 0 over the last `release` seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub waveform: Waveform,
    pub duration: f32,
    pub volume: f32,
    pub attack: f32,
    pub release: f32,
    /// -1 (left) to 1 (right).
    pub pan: f32,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            freq: 440.0,
            waveform: Waveform::Sine,
            duration: 0.15,
            volume: 0.3,
            attack: 0.01,
            release: 0.08,
            pan: 0.0,
        }
    }
}

impl Tone {
    pub fn new(freq: f32) -> Self {
        Self { freq, ..Self::default() }
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_envelope(mut self, attack: f32, release: f32) -> Self {
        self.attack = attack;
        self.release = release;
        self
    }

    pub fn with_pan(mut self, pan: f32) -> Self {
        self.pan = pan;
        self
    }

    /// Gain at time `t` seconds after the voice starts.
    pub fn envelope(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration {
            return 0.0;
        }
        let rise = if self.attack > 0.0 { t / self.attack } else { 1.0 };
        let fall = if self.release > 0.0 { (self.duration - t) / self.release } else { 1.0 };
        self.volume * rise.min(fall).clamp(0.0, 1.0)
    }

    /// Equal-power `(left, right)` gains for `pan`.
    pub fn pan_gains(&self) -> (f32, f32) {
        let x = (self.pan.clamp(-1.0, 1.0) + 1.0) * 0.5;
        ((x * FRAC_PI_2).cos(), (x * FRAC_PI_2).sin())
    }
}

pub const SAMPLE_RATE: u32 = 44_100;
const CHANNELS: u16 = 2;

/// Renders a `Tone` as interleaved stereo `f32` samples.
///
/// The envelope is evaluated per sample, so its timing follows the audio clock rather
/// than the frame loop.
#[derive(Debug, Clone)]
pub struct ToneSource {
    tone: Tone,
    gains: (f32, f32),
    frame: u64,
    total_frames: u64,
    right_pending: Option<f32>,
}

impl ToneSource {
    pub fn new(tone: Tone) -> Self {
        let total_frames = (tone.duration.max(0.0) * SAMPLE_RATE as f32).round() as u64;
        Self {
            gains: tone.pan_gains(),
            tone,
            frame: 0,
            total_frames,
            right_pending: None,
        }
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if let Some(right) = self.right_pending.take() {
            return Some(right);
        }
        if self.frame >= self.total_frames {
            return None;
        }

        let t = self.frame as f32 / SAMPLE_RATE as f32;
        let phase = (t * self.tone.freq).fract();
        let v = self.tone.waveform.sample(phase) * self.tone.envelope(t);
        self.frame += 1;

        self.right_pending = Some(v * self.gains.1);
        Some(v * self.gains.0)
    }
}

impl rodio::Source for ToneSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        CHANNELS
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(self.tone.duration.max(0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn envelope_rises_holds_and_releases() {
        let tone = Tone::default();
        assert_relative_eq!(tone.envelope(0.0), 0.0);
        assert_relative_eq!(tone.envelope(0.005), 0.15, epsilon = 1e-5);
        assert_relative_eq!(tone.envelope(0.05), 0.3);
        assert_relative_eq!(tone.envelope(0.11), 0.15, epsilon = 1e-5);
        assert_relative_eq!(tone.envelope(0.15), 0.0);
    }

    #[test]
    fn source_length_matches_duration() {
        let src = ToneSource::new(Tone::default().with_duration(0.1));
        assert_eq!(src.count(), 4410 * 2);
    }

    #[test]
    fn hard_pan_silences_the_other_side() {
        let (l, r) = Tone::default().with_pan(-1.0).pan_gains();
        assert_relative_eq!(l, 1.0);
        assert_relative_eq!(r, 0.0, epsilon = 1e-6);

        let (l, r) = Tone::default().pan_gains();
        assert_relative_eq!(l, r, epsilon = 1e-6);
    }

    #[test]
    fn waveforms_stay_in_range() {
        for w in [Waveform::Sine, Waveform::Square, Waveform::Sawtooth, Waveform::Triangle] {
            for i in 0..100 {
                let s = w.sample(i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&s), "{w:?} {s}");
            }
        }
        assert_eq!("square".parse::<Waveform>(), Ok(Waveform::Square));
    }
}
