use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::AudioError;

use super::backend::{AudioBackend, RodioBackend, VoiceId};
use super::sound::SoundData;
use super::tone::Tone;

/// Creates the audio backend on first use.
pub type BackendFactory = Box<dyn FnMut() -> Result<Box<dyn AudioBackend>, AudioError>>;

/// Per-play overrides for a registered sample.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PlayOptions {
    /// Overrides the sample's default volume.
    pub volume: Option<f32>,
    pub looped: bool,
}

impl PlayOptions {
    pub fn volume(volume: f32) -> Self {
        Self { volume: Some(volume), looped: false }
    }

    pub fn looped() -> Self {
        Self { volume: None, looped: true }
    }
}

/// Stoppable handle returned by `AudioSynthesizer::play`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VoiceHandle(VoiceId);

#[derive(Debug, Clone)]
struct Sample {
    data: SoundData,
    volume: f32,
}

enum Backend {
    Pending,
    Ready(Box<dyn AudioBackend>),
    Unavailable,
}

/// Procedural tones and named sample playback over a lazily opened backend.
///
/// Nothing here fails loudly: without a usable backend every call is a no-op.
pub struct AudioSynthesizer {
    factory: BackendFactory,
    backend: Backend,
    samples: HashMap<String, Sample>,
    unlocked: bool,
    root: PathBuf,
}

impl AudioSynthesizer {
    /// Uses the default rodio output device.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_factory(root, Box::new(|| Ok(Box::new(RodioBackend::new()?) as Box<dyn AudioBackend>)))
    }

    pub fn with_factory(root: impl Into<PathBuf>, factory: BackendFactory) -> Self {
        Self {
            factory,
            backend: Backend::Pending,
            samples: HashMap::new(),
            unlocked: false,
            root: root.into(),
        }
    }

    fn backend(&mut self) -> Option<&mut dyn AudioBackend> {
        if matches!(self.backend, Backend::Pending) {
            self.backend = match (self.factory)() {
                Ok(b) => Backend::Ready(b),
                Err(e) => {
                    log::warn!("audio disabled: {e}");
                    Backend::Unavailable
                }
            };
        }
        match &mut self.backend {
            Backend::Ready(b) => Some(b.as_mut()),
            _ => None,
        }
    }

    /// `false` once opening the backend has failed. A backend that was never needed
    /// counts as available.
    pub fn is_available(&self) -> bool {
        !matches!(self.backend, Backend::Unavailable)
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Registers (or replaces) a sample at full default volume.
    pub fn register(&mut self, name: impl Into<String>, data: SoundData) {
        self.samples.insert(name.into(), Sample { data, volume: 1.0 });
    }

    /// Reads a sound file (relative paths resolve against the asset root) and registers it.
    pub fn register_path(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<(), AudioError> {
        let path = self.root.join(path.as_ref());
        let bytes = std::fs::read(&path).map_err(|source| AudioError::Io { path, source })?;
        self.register(name, SoundData::from_bytes(bytes));
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.samples.contains_key(name)
    }

    /// Plays an independent voice of a registered sample.
    pub fn play(&mut self, name: &str, opts: PlayOptions) -> Option<VoiceHandle> {
        let Some(sample) = self.samples.get(name).cloned() else {
            log::warn!("audio not registered: {name}");
            return None;
        };
        let volume = opts.volume.unwrap_or(sample.volume);

        let backend = self.backend()?;
        match backend.play_sample(&sample.data, volume, opts.looped) {
            Ok(id) => Some(VoiceHandle(id)),
            Err(e) => {
                log::debug!("play '{name}' failed: {e}");
                None
            }
        }
    }

    pub fn stop(&mut self, handle: VoiceHandle) {
        if let Backend::Ready(b) = &mut self.backend {
            b.stop(handle.0);
        }
    }

    /// Changes the default volume of future plays of `name`.
    pub fn set_volume(&mut self, name: &str, volume: f32) {
        if let Some(sample) = self.samples.get_mut(name) {
            sample.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Plays one synthesized voice.
    pub fn tone(&mut self, tone: &Tone) {
        let Some(backend) = self.backend() else { return };
        if backend.is_suspended() {
            let _ = backend.resume();
        }
        if let Err(e) = backend.play_tone(tone) {
            log::debug!("tone failed: {e}");
        }
    }

    /// One-shot unlock for gesture-gated output: plays silence and resumes a suspended
    /// backend. Later calls are no-ops.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        let Some(backend) = self.backend() else { return };

        if let Err(e) = backend.play_silence() {
            log::debug!("silent unlock play blocked: {e}");
        }
        if backend.is_suspended() {
            if let Err(e) = backend.resume() {
                log::debug!("audio resume failed: {e}");
            }
        }
        self.unlocked = true;
        log::debug!("audio unlocked");
    }

    /// Releases finished voices. Does not open the backend.
    pub fn update(&mut self) {
        if let Backend::Ready(b) = &mut self.backend {
            b.update();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        tones: Vec<Tone>,
        samples: Vec<(f32, bool)>,
        stopped: Vec<VoiceId>,
        silences: u32,
        resumes: u32,
    }

    struct Fake {
        log: Rc<RefCell<Log>>,
        suspended: bool,
        next: u32,
    }

    impl AudioBackend for Fake {
        fn play_tone(&mut self, tone: &Tone) -> Result<(), AudioError> {
            self.log.borrow_mut().tones.push(*tone);
            Ok(())
        }

        fn play_sample(&mut self, _: &SoundData, volume: f32, looped: bool) -> Result<VoiceId, AudioError> {
            self.log.borrow_mut().samples.push((volume, looped));
            self.next += 1;
            Ok(VoiceId(self.next))
        }

        fn stop(&mut self, voice: VoiceId) {
            self.log.borrow_mut().stopped.push(voice);
        }

        fn is_suspended(&self) -> bool {
            self.suspended
        }

        fn resume(&mut self) -> Result<(), AudioError> {
            self.suspended = false;
            self.log.borrow_mut().resumes += 1;
            Ok(())
        }

        fn play_silence(&mut self) -> Result<(), AudioError> {
            self.log.borrow_mut().silences += 1;
            Ok(())
        }
    }

    fn synth(suspended: bool) -> (AudioSynthesizer, Rc<RefCell<Log>>, Rc<Cell<u32>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let opened = Rc::new(Cell::new(0));
        let (l, o) = (log.clone(), opened.clone());
        let synth = AudioSynthesizer::with_factory(
            ".",
            Box::new(move || {
                o.set(o.get() + 1);
                Ok(Box::new(Fake { log: l.clone(), suspended, next: 0 }) as Box<dyn AudioBackend>)
            }),
        );
        (synth, log, opened)
    }

    fn beep() -> SoundData {
        SoundData::from_bytes(vec![0u8; 4])
    }

    #[test]
    fn backend_opens_lazily_and_once() {
        let (mut s, log, opened) = synth(false);
        s.register("beep", beep());
        assert_eq!(opened.get(), 0);

        s.tone(&Tone::default());
        s.tone(&Tone::new(880.0));
        assert_eq!(opened.get(), 1);
        assert_eq!(log.borrow().tones.len(), 2);
        assert_eq!(log.borrow().tones[1].freq, 880.0);
    }

    #[test]
    fn each_play_is_an_independent_voice() {
        let (mut s, log, _) = synth(false);
        s.register("beep", beep());

        let a = s.play("beep", PlayOptions::default());
        let b = s.play("beep", PlayOptions::looped());
        assert!(a.is_some() && b.is_some());
        assert_ne!(a, b);

        if let Some(a) = a {
            s.stop(a);
        }
        assert_eq!(log.borrow().stopped.len(), 1);
        assert_eq!(log.borrow().samples, vec![(1.0, false), (1.0, true)]);
    }

    #[test]
    fn set_volume_applies_to_future_plays() {
        let (mut s, log, _) = synth(false);
        s.register("beep", beep());
        s.set_volume("beep", 0.25);
        s.play("beep", PlayOptions::default());
        s.play("beep", PlayOptions::volume(0.8));
        assert_eq!(log.borrow().samples, vec![(0.25, false), (0.8, false)]);
    }

    #[test]
    fn unregistered_play_returns_none() {
        let (mut s, _, opened) = synth(false);
        assert!(s.play("missing", PlayOptions::default()).is_none());
        assert_eq!(opened.get(), 0);
    }

    #[test]
    fn unlock_runs_once_and_resumes() {
        let (mut s, log, _) = synth(true);
        s.unlock();
        s.unlock();
        assert!(s.is_unlocked());
        assert_eq!(log.borrow().silences, 1);
        assert_eq!(log.borrow().resumes, 1);
    }

    #[test]
    fn unavailable_backend_degrades_to_no_ops() {
        let opened = Rc::new(Cell::new(0));
        let o = opened.clone();
        let mut s = AudioSynthesizer::with_factory(
            ".",
            Box::new(move || {
                o.set(o.get() + 1);
                Err(AudioError::Unavailable)
            }),
        );
        s.register("beep", beep());

        s.tone(&Tone::default());
        s.unlock();
        assert!(s.play("beep", PlayOptions::default()).is_none());
        assert!(!s.is_available());
        assert!(!s.is_unlocked());
        assert_eq!(opened.get(), 1);
    }
}
