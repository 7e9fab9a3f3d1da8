use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assets::AssetLoader;
use crate::audio::AudioSynthesizer;
use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::input::InputHub;
use crate::tween::TweenScheduler;
use crate::util::Rng;

/// Completion signal handed to `Scene::load`.
///
/// Signal it (from any thread) once loading is finished; the scene is entered on the
/// next frame that observes it.
#[derive(Debug, Clone, Default)]
pub struct LoadDone(Arc<AtomicBool>);

impl LoadDone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_signalled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Requests a scene can make of the engine. Applied after the current callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    SwitchScene(String),
    Pause,
    Resume,
    Stop,
}

/// Engine services available to scene callbacks.
pub struct SceneCtx<'a> {
    pub input: &'a InputHub,
    pub camera: &'a mut Camera,
    pub tweens: &'a mut TweenScheduler,
    pub audio: &'a mut AudioSynthesizer,
    pub assets: &'a AssetLoader,
    pub rng: &'a mut Rng,
    pub config: &'a EngineConfig,
    /// Smoothed frames per second.
    pub fps: f32,
    commands: &'a mut Vec<SceneCommand>,
}

impl<'a> SceneCtx<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        input: &'a InputHub,
        camera: &'a mut Camera,
        tweens: &'a mut TweenScheduler,
        audio: &'a mut AudioSynthesizer,
        assets: &'a AssetLoader,
        rng: &'a mut Rng,
        config: &'a EngineConfig,
        fps: f32,
        commands: &'a mut Vec<SceneCommand>,
    ) -> Self {
        Self { input, camera, tweens, audio, assets, rng, config, fps, commands }
    }

    /// Switches scenes once the current callback returns.
    pub fn switch_scene(&mut self, name: impl Into<String>) {
        self.commands.push(SceneCommand::SwitchScene(name.into()));
    }

    pub fn pause(&mut self) {
        self.commands.push(SceneCommand::Pause);
    }

    pub fn resume(&mut self) {
        self.commands.push(SceneCommand::Resume);
    }

    pub fn stop(&mut self) {
        self.commands.push(SceneCommand::Stop);
    }
}
