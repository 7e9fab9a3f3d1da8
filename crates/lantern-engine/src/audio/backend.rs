use std::collections::HashMap;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::AudioError;

use super::sound::SoundData;
use super::tone::{Tone, ToneSource, SAMPLE_RATE};

/// Identifier of a playing sample voice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VoiceId(pub u32);

/// Host audio output.
///
/// Each call produces an independent voice; voices share nothing except the output.
pub trait AudioBackend {
    /// Fire-and-forget synthesized voice.
    fn play_tone(&mut self, tone: &Tone) -> Result<(), AudioError>;

    fn play_sample(&mut self, data: &SoundData, volume: f32, looped: bool) -> Result<VoiceId, AudioError>;

    /// Stops a sample voice. Unknown or finished voices are ignored.
    fn stop(&mut self, voice: VoiceId);

    /// Whether output is held back until a user gesture.
    fn is_suspended(&self) -> bool {
        false
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    /// Plays a very short silent buffer; used to satisfy gesture-gated hosts.
    fn play_silence(&mut self) -> Result<(), AudioError>;

    /// Releases finished voices.
    fn update(&mut self) {}
}

/// Rodio-based output.
pub struct RodioBackend {
    /// Must stay alive for the handle to produce sound.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    voices: HashMap<VoiceId, Sink>,
    next_id: u32,
}

impl RodioBackend {
    pub fn new() -> Result<Self, AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Init(e.to_string()))?;
        log::info!("rodio audio output opened");
        Ok(Self {
            _stream: stream,
            handle,
            voices: HashMap::new(),
            next_id: 0,
        })
    }

    fn next_voice(&mut self) -> VoiceId {
        let id = VoiceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

impl AudioBackend for RodioBackend {
    fn play_tone(&mut self, tone: &Tone) -> Result<(), AudioError> {
        self.handle
            .play_raw(ToneSource::new(*tone))
            .map_err(|e| AudioError::Playback(e.to_string()))
    }

    fn play_sample(&mut self, data: &SoundData, volume: f32, looped: bool) -> Result<VoiceId, AudioError> {
        let sink = Sink::try_new(&self.handle).map_err(|e| AudioError::Playback(e.to_string()))?;
        let source = data.decoder()?;
        if looped {
            sink.append(source.buffered().repeat_infinite());
        } else {
            sink.append(source);
        }
        sink.set_volume(volume);

        let id = self.next_voice();
        self.voices.insert(id, sink);
        Ok(id)
    }

    fn stop(&mut self, voice: VoiceId) {
        if let Some(sink) = self.voices.remove(&voice) {
            sink.stop();
        }
    }

    fn play_silence(&mut self) -> Result<(), AudioError> {
        let silence = rodio::source::Zero::<f32>::new(2, SAMPLE_RATE).take_duration(Duration::from_millis(10));
        self.handle
            .play_raw(silence)
            .map_err(|e| AudioError::Playback(e.to_string()))
    }

    fn update(&mut self) {
        self.voices.retain(|_, sink| !sink.empty());
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        for (_, sink) in self.voices.drain() {
            sink.stop();
        }
    }
}
