use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::assets::{AssetBag, AssetLoader, AssetManifest, FileFetcher, Fetch, PendingAssets, Progress};
use crate::audio::{AudioSynthesizer, BackendFactory};
use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::coords::DisplayAdapter;
use crate::draw::{overlay, Canvas, FontSystem, Surface};
use crate::input::{InputEvent, InputHub};
use crate::scene::{Scene, SceneCommand, SceneCtx, SceneManager};
use crate::time::{FrameScheduler, FrameTime, SystemClock, TimeSource};
use crate::tween::{Easing, TweenCallback, TweenHandle, TweenScheduler, Tweenable};
use crate::util::Rng;

/// Command rounds applied per callback before the rest is dropped. Guards against
/// scenes that switch back and forth from `on_enter`.
const MAX_COMMAND_ROUNDS: usize = 16;

/// Services handed to scenes. Kept apart from the scene registry so both can be
/// borrowed at once.
struct Services {
    input: InputHub,
    camera: Camera,
    tweens: TweenScheduler,
    audio: AudioSynthesizer,
    assets: AssetLoader,
    rng: Rng,
    commands: Vec<SceneCommand>,
}

impl Services {
    fn ctx<'a>(&'a mut self, config: &'a EngineConfig, fps: f32) -> SceneCtx<'a> {
        SceneCtx::new(
            &self.input,
            &mut self.camera,
            &mut self.tweens,
            &mut self.audio,
            &self.assets,
            &mut self.rng,
            config,
            fps,
            &mut self.commands,
        )
    }
}

type ProgressFn = Box<dyn FnMut(Progress)>;
type CompleteFn = Box<dyn FnOnce(AssetBag, &mut Engine)>;

struct LoadJob {
    pending: PendingAssets,
    on_progress: ProgressFn,
    on_complete: Option<CompleteFn>,
}

/// Builder for `Engine`; every collaborator defaults to the real platform one.
pub struct EngineBuilder {
    config: EngineConfig,
    clock: Option<Box<dyn TimeSource>>,
    audio: Option<BackendFactory>,
    fetcher: Option<Arc<dyn Fetch>>,
}

impl EngineBuilder {
    pub fn clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn audio_backend(mut self, factory: BackendFactory) -> Self {
        self.audio = Some(factory);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn build(self) -> Engine {
        let EngineBuilder { config, clock, audio, fetcher } = self;

        let display = DisplayAdapter::new(config.width, config.height);
        let view = display.logical_size();

        let rng = Rng::new(config.seed);
        let camera_rng = Rng::new(config.seed.map(|s| s.wrapping_add(1)));

        let audio = match audio {
            Some(factory) => AudioSynthesizer::with_factory(config.asset_root.clone(), factory),
            None => AudioSynthesizer::new(config.asset_root.clone()),
        };
        let fetcher = fetcher.unwrap_or_else(|| Arc::new(FileFetcher::new(config.asset_root.clone())));

        let services = Services {
            input: InputHub::new(config.tap_threshold),
            camera: Camera::new(view, camera_rng),
            tweens: TweenScheduler::new(),
            audio,
            assets: AssetLoader::new(fetcher),
            rng,
            commands: Vec::new(),
        };

        log::debug!(
            "engine '{}' created at {}x{} (orientation {})",
            config.title,
            config.width,
            config.height,
            config.orientation.label()
        );

        Engine {
            scheduler: FrameScheduler::new(config.max_delta_time),
            clock: clock.unwrap_or_else(|| Box::new(SystemClock)),
            surface: Surface::new(config.width, config.height),
            fonts: FontSystem::new(),
            scenes: SceneManager::new(),
            loads: Vec::new(),
            display,
            services,
            config,
        }
    }
}

/// The runtime: frame scheduler, scene manager and the services scenes consume.
pub struct Engine {
    config: EngineConfig,
    clock: Box<dyn TimeSource>,
    scheduler: FrameScheduler,
    display: DisplayAdapter,
    scenes: SceneManager,
    services: Services,
    loads: Vec<LoadJob>,
    surface: Surface,
    fonts: FontSystem,
}

impl Engine {
    /// Engine with the system clock, default audio device and file-system assets.
    pub fn new(config: EngineConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder { config, clock: None, audio: None, fetcher: None }
    }

    // ---- lifecycle ----

    /// Starts the frame loop. Calling it while running does nothing.
    pub fn start(&mut self) {
        let now = self.clock.now();
        if self.scheduler.start(now) {
            let view = self.display.viewport();
            self.check_orientation(view.width as u32, view.height as u32);
        }
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn pause(&mut self) {
        self.scheduler.pause();
    }

    pub fn resume(&mut self) {
        self.scheduler.resume(self.clock.now());
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    /// Whether the viewport currently fails the orientation requirement.
    pub fn is_blocked(&self) -> bool {
        self.scheduler.is_blocked()
    }

    /// Whether the host should schedule another `frame` call.
    pub fn frame_requested(&self) -> bool {
        self.scheduler.frame_requested()
    }

    pub fn fps(&self) -> f32 {
        self.scheduler.fps()
    }

    // ---- scenes ----

    pub fn add_scene(&mut self, name: impl Into<String>, scene: impl Scene + 'static) {
        self.scenes.add_scene(name, scene);
    }

    /// Switches to `name`. Unknown names are logged and leave everything unchanged;
    /// returns whether the switch was accepted.
    pub fn switch_scene(&mut self, name: &str) -> bool {
        let fps = self.scheduler.fps();
        let mut ctx = self.services.ctx(&self.config, fps);
        let ok = self.scenes.switch_scene(name, &mut ctx).is_ok();
        self.apply_commands();
        ok
    }

    pub fn active_scene(&self) -> Option<&str> {
        self.scenes.active()
    }

    // ---- services ----

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn display(&self) -> &DisplayAdapter {
        &self.display
    }

    pub fn input(&self) -> &InputHub {
        &self.services.input
    }

    pub fn input_mut(&mut self) -> &mut InputHub {
        &mut self.services.input
    }

    pub fn camera(&self) -> &Camera {
        &self.services.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.services.camera
    }

    pub fn tweens_mut(&mut self) -> &mut TweenScheduler {
        &mut self.services.tweens
    }

    pub fn audio_mut(&mut self) -> &mut AudioSynthesizer {
        &mut self.services.audio
    }

    pub fn rng_mut(&mut self) -> &mut Rng {
        &mut self.services.rng
    }

    pub fn fonts_mut(&mut self) -> &mut FontSystem {
        &mut self.fonts
    }

    /// The last rendered frame at logical resolution.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn tween<T: Tweenable + 'static>(
        &mut self,
        target: &Rc<RefCell<T>>,
        props: &[(&str, f32)],
        duration: f32,
        easing: impl Into<Easing>,
        on_complete: Option<TweenCallback>,
    ) -> TweenHandle {
        self.services.tweens.tween(target, props, duration, easing, on_complete)
    }

    // ---- host events ----

    /// Feeds one input event with positions in physical viewport pixels.
    ///
    /// The first user gesture also unlocks audio. Returns whether the host should
    /// suppress the platform default for this event.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let event = event.map_position(|p| self.display.to_logical(p));
        if event.is_user_gesture() && !self.services.audio.is_unlocked() {
            self.services.audio.unlock();
        }
        self.services.input.apply_event(&event, self.clock.now())
    }

    /// New physical viewport size. Refits the display and re-evaluates orientation.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.display.resize(width, height);
        if width > 0 && height > 0 {
            self.check_orientation(width, height);
        }
    }

    fn check_orientation(&mut self, width: u32, height: u32) {
        let blocked = !self.config.orientation.accepts(width, height);
        if blocked != self.scheduler.is_blocked() {
            if blocked {
                log::info!("viewport {width}x{height} is not {}; simulation blocked", self.config.orientation.label());
            } else {
                log::info!("orientation satisfied; simulation resumed");
            }
        }
        self.scheduler.set_blocked(blocked, self.clock.now());
    }

    // ---- assets ----

    /// Loads `manifest` in the background.
    ///
    /// `on_progress` sees every settled entry; `on_complete` runs on a later frame (or
    /// immediately for an empty manifest) with the entries that loaded.
    pub fn load(
        &mut self,
        manifest: &AssetManifest,
        on_progress: impl FnMut(Progress) + 'static,
        on_complete: impl FnOnce(AssetBag, &mut Engine) + 'static,
    ) {
        if manifest.is_empty() {
            on_complete(AssetBag::default(), self);
            return;
        }
        log::debug!("loading {} asset(s)", manifest.len());
        self.loads.push(LoadJob {
            pending: self.services.assets.start(manifest),
            on_progress: Box::new(on_progress),
            on_complete: Some(Box::new(on_complete)),
        });
    }

    /// Combined progress of every in-flight load, or `None` when nothing is loading.
    pub fn load_progress(&self) -> Option<Progress> {
        if self.loads.is_empty() {
            return None;
        }
        let (loaded, total) = self.loads.iter().fold((0, 0), |(l, t), job| {
            let p = job.pending.progress();
            (l + p.loaded, t + p.total)
        });
        Some(Progress { loaded, total })
    }

    fn poll_loads(&mut self) {
        if self.loads.is_empty() {
            return;
        }
        let mut finished = Vec::new();
        let mut jobs = std::mem::take(&mut self.loads);
        jobs.retain_mut(|job| match job.pending.poll(&mut job.on_progress) {
            Some(bag) => {
                finished.extend(job.on_complete.take().map(|cb| (bag, cb)));
                false
            }
            None => true,
        });
        // Loads started from completion callbacks land in `self.loads` meanwhile.
        jobs.append(&mut self.loads);
        self.loads = jobs;

        for (bag, on_complete) in finished {
            log::debug!("asset load complete: {} image(s), {} sound(s)", bag.images.len(), bag.sounds.len());
            on_complete(bag, self);
        }
    }

    // ---- frame ----

    /// Runs one frame: simulation (or the active scene's `paused` hook while paused),
    /// pending loads, then the render pass. Returns `None` when the loop is not running.
    pub fn frame(&mut self) -> Option<FrameTime> {
        let now = self.clock.now();
        let ft = self.scheduler.tick(now)?;

        if self.scheduler.should_simulate() {
            self.services.camera.update(ft.dt);
            self.services.tweens.step(ft.dt);
            {
                let mut ctx = self.services.ctx(&self.config, ft.fps);
                self.scenes.update_active(&mut ctx, ft.dt);
            }
            self.apply_commands();
            self.services.input.end_frame();
        } else if self.scheduler.is_paused() && !self.scheduler.is_blocked() {
            {
                let mut ctx = self.services.ctx(&self.config, ft.fps);
                self.scenes.paused_active(&mut ctx);
            }
            self.apply_commands();
            self.services.input.end_frame();
        }

        if self.scenes.is_loading() {
            let mut ctx = self.services.ctx(&self.config, ft.fps);
            self.scenes.poll_pending(&mut ctx);
            self.apply_commands();
        }
        self.poll_loads();
        self.services.audio.update();

        self.render(ft.fps);
        Some(ft)
    }

    fn render(&mut self, fps: f32) {
        self.surface.clear(self.config.background);
        let progress = self.load_progress();

        if self.scenes.active().is_some() {
            let translation = self.services.camera.translation();
            let mut canvas = Canvas::new(&mut self.surface, &self.fonts, translation);
            self.scenes.draw_active(&mut canvas);
        } else if let Some(progress) = progress {
            overlay::loading_bar(&mut Canvas::screen(&mut self.surface, &self.fonts), progress.ratio());
        }

        if self.scheduler.is_blocked() {
            overlay::orientation_overlay(&mut Canvas::screen(&mut self.surface, &self.fonts), self.config.orientation);
        }

        if self.config.show_fps {
            overlay::fps_readout(&mut Canvas::screen(&mut self.surface, &self.fonts), fps);
        }
    }

    fn apply_commands(&mut self) {
        for _ in 0..MAX_COMMAND_ROUNDS {
            if self.services.commands.is_empty() {
                return;
            }
            let commands = std::mem::take(&mut self.services.commands);
            for cmd in commands {
                match cmd {
                    SceneCommand::SwitchScene(name) => {
                        let fps = self.scheduler.fps();
                        let mut ctx = self.services.ctx(&self.config, fps);
                        let _ = self.scenes.switch_scene(&name, &mut ctx);
                    }
                    SceneCommand::Pause => self.pause(),
                    SceneCommand::Resume => self.resume(),
                    SceneCommand::Stop => self.stop(),
                }
            }
        }
        if !self.services.commands.is_empty() {
            log::warn!("dropping {} scene command(s) after {MAX_COMMAND_ROUNDS} rounds", self.services.commands.len());
            self.services.commands.clear();
        }
    }
}
