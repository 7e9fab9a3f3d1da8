//! Procedural tones and sample playback.
//!
//! `AudioSynthesizer` is the service scenes talk to. It opens its `AudioBackend`
//! lazily, since some hosts only allow audio after a user gesture.

mod backend;
mod sound;
mod synth;
mod tone;

pub use backend::{AudioBackend, RodioBackend, VoiceId};
pub use sound::SoundData;
pub use synth::{AudioSynthesizer, BackendFactory, PlayOptions, VoiceHandle};
pub use tone::{Tone, ToneSource, Waveform, SAMPLE_RATE};
