use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;

use lantern_engine::assets::{AssetManifest, Fetch, MemoryFetcher, Progress};
use lantern_engine::audio::{AudioBackend, SoundData, Tone, VoiceId};
use lantern_engine::coords::Vec2;
use lantern_engine::draw::{Canvas, DrawOpts};
use lantern_engine::error::AudioError;
use lantern_engine::input::{InputEvent, Key, KeyState, MouseButton};
use lantern_engine::paint::Color;
use lantern_engine::time::ManualClock;
use lantern_engine::{Engine, EngineConfig, Orientation, Scene, SceneCtx};

const STEP: f32 = 1.0 / 60.0;

#[derive(Default)]
struct Record {
    updates: Vec<f32>,
    jumps: usize,
    entered: usize,
}

struct Recorder {
    record: Rc<RefCell<Record>>,
    switch_to: Option<&'static str>,
}

impl Scene for Recorder {
    fn on_enter(&mut self, _ctx: &mut SceneCtx<'_>) {
        self.record.borrow_mut().entered += 1;
    }

    fn update(&mut self, ctx: &mut SceneCtx<'_>, dt: f32) {
        let mut r = self.record.borrow_mut();
        r.updates.push(dt);
        if ctx.input.just_pressed("jump") {
            r.jumps += 1;
        }
        if let Some(name) = self.switch_to.take() {
            ctx.switch_scene(name);
        }
    }

    fn draw(&self, canvas: &mut Canvas<'_>) {
        canvas.rect(0.0, 0.0, 10.0, 10.0, Color::WHITE, DrawOpts::default());
    }
}

#[derive(Default)]
struct AudioLog {
    tones: usize,
    silences: usize,
}

struct FakeAudio(Rc<RefCell<AudioLog>>);

impl AudioBackend for FakeAudio {
    fn play_tone(&mut self, _tone: &Tone) -> Result<(), AudioError> {
        self.0.borrow_mut().tones += 1;
        Ok(())
    }

    fn play_sample(&mut self, _data: &SoundData, _volume: f32, _looped: bool) -> Result<VoiceId, AudioError> {
        Ok(VoiceId(0))
    }

    fn stop(&mut self, _voice: VoiceId) {}

    fn play_silence(&mut self) -> Result<(), AudioError> {
        self.0.borrow_mut().silences += 1;
        Ok(())
    }
}

struct Rig {
    engine: Engine,
    clock: ManualClock,
    audio: Rc<RefCell<AudioLog>>,
    record: Rc<RefCell<Record>>,
}

impl Rig {
    fn new(config: EngineConfig) -> Self {
        Self::with_fetcher(config, MemoryFetcher::new())
    }

    fn with_fetcher(config: EngineConfig, fetcher: MemoryFetcher) -> Self {
        let clock = ManualClock::new();
        let audio = Rc::new(RefCell::new(AudioLog::default()));
        let a = audio.clone();
        let engine = Engine::builder(config.with_seed(7))
            .clock(clock.clone())
            .audio_backend(Box::new(move || Ok(Box::new(FakeAudio(a.clone())) as Box<dyn AudioBackend>)))
            .fetcher(Arc::new(fetcher))
            .build();
        Self { engine, clock, audio, record: Rc::default() }
    }

    fn small() -> Self {
        Self::new(EngineConfig::default().with_size(40, 40))
    }

    fn add(&mut self, name: &str, switch_to: Option<&'static str>) {
        let record = self.record.clone();
        self.engine.add_scene(name, Recorder { record, switch_to });
    }

    fn step(&mut self, secs: f32) {
        self.clock.advance_secs(secs);
        self.engine.frame();
    }

    fn key(&mut self, key: Key, state: KeyState) {
        self.engine.handle_input(InputEvent::Key { key, state, repeat: false });
    }

    fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let p = self.engine.surface().pixel(x, y).unwrap();
        (p.r, p.g, p.b)
    }
}

#[test]
fn update_receives_capped_delta() {
    let mut rig = Rig::small();
    rig.add("main", None);
    assert!(rig.engine.switch_scene("main"));
    rig.engine.start();

    rig.step(STEP);
    rig.step(5.0);

    let r = rig.record.borrow();
    assert_relative_eq!(r.updates[0], STEP, epsilon = 1e-4);
    assert_relative_eq!(r.updates[1], 0.05);
}

#[test]
fn jump_edge_is_seen_on_exactly_one_tick() {
    let mut rig = Rig::small();
    rig.add("main", None);
    rig.engine.switch_scene("main");
    rig.engine.start();

    rig.key(Key::Space, KeyState::Pressed);
    rig.step(STEP);
    rig.step(STEP);
    rig.key(Key::Space, KeyState::Pressed); // auto-repeat while held is not a new edge
    rig.step(STEP);

    assert_eq!(rig.record.borrow().jumps, 1);
    assert!(rig.engine.input().is_down("jump"));

    rig.key(Key::Space, KeyState::Released);
    assert!(rig.engine.input().just_released("jump"));
    rig.step(STEP);
    assert!(!rig.engine.input().just_released("jump"));
}

#[test]
fn pause_keeps_rendering_and_resume_avoids_a_spike() {
    let mut rig = Rig::small();
    rig.add("main", None);
    rig.engine.switch_scene("main");
    rig.engine.start();
    rig.step(STEP);

    rig.engine.pause();
    let ft = rig.engine.frame();
    assert!(ft.is_some());
    rig.clock.advance(Duration::from_secs(10));
    rig.engine.frame();
    assert_eq!(rig.record.borrow().updates.len(), 1);
    assert_eq!(rig.pixel(2, 2), (255, 255, 255));

    rig.engine.resume();
    let ft = rig.engine.frame().unwrap();
    assert!(ft.raw_dt < 1e-3);
    assert_eq!(rig.record.borrow().updates.len(), 2);
}

struct PauseToggle {
    record: Rc<RefCell<Record>>,
}

impl Scene for PauseToggle {
    fn update(&mut self, ctx: &mut SceneCtx<'_>, dt: f32) {
        self.record.borrow_mut().updates.push(dt);
        if ctx.input.just_pressed("pause") {
            ctx.pause();
        }
    }

    fn paused(&mut self, ctx: &mut SceneCtx<'_>) {
        if ctx.input.just_pressed("pause") {
            ctx.resume();
        }
    }
}

#[test]
fn pause_key_pauses_and_resumes_through_the_scene() {
    let mut rig = Rig::small();
    let record = rig.record.clone();
    rig.engine.add_scene("main", PauseToggle { record });
    rig.engine.switch_scene("main");
    rig.engine.start();
    rig.step(STEP);

    rig.key(Key::Escape, KeyState::Pressed);
    rig.step(STEP);
    assert!(rig.engine.is_paused());

    for _ in 0..3 {
        rig.step(10.0);
    }
    assert_eq!(rig.record.borrow().updates.len(), 2);

    rig.key(Key::Escape, KeyState::Released);
    rig.key(Key::Escape, KeyState::Pressed);
    rig.step(STEP);
    assert!(!rig.engine.is_paused());
    assert_eq!(rig.record.borrow().updates.len(), 2);

    rig.step(STEP);
    let r = rig.record.borrow();
    assert_eq!(r.updates.len(), 3);
    assert_relative_eq!(r.updates[2], STEP, epsilon = 1e-4);
}

#[test]
fn stop_releases_the_frame_request() {
    let mut rig = Rig::small();
    rig.engine.start();
    assert!(rig.engine.frame_requested());
    rig.engine.stop();
    assert!(!rig.engine.frame_requested());
    assert!(rig.engine.frame().is_none());
}

#[test]
fn scene_draw_is_offset_by_the_camera() {
    let mut rig = Rig::small();
    rig.add("main", None);
    rig.engine.switch_scene("main");
    rig.engine.start();

    rig.engine.camera_mut().position = Vec2::new(5.0, 0.0);
    rig.step(STEP);

    assert_eq!(rig.pixel(2, 2), (255, 255, 255));
    assert_eq!(rig.pixel(7, 2), (0, 0, 0));
}

#[test]
fn switch_requested_during_update_applies_before_render() {
    let mut rig = Rig::small();
    rig.add("a", Some("b"));
    rig.add("b", None);
    rig.engine.switch_scene("a");
    rig.engine.start();
    assert_eq!(rig.record.borrow().entered, 1);

    rig.step(STEP);
    assert_eq!(rig.engine.active_scene(), Some("b"));
    assert_eq!(rig.record.borrow().entered, 2);
}

#[test]
fn unknown_scene_is_rejected() {
    let mut rig = Rig::small();
    rig.add("a", None);
    rig.engine.switch_scene("a");
    assert!(!rig.engine.switch_scene("missing"));
    assert_eq!(rig.engine.active_scene(), Some("a"));
}

#[test]
fn wrong_orientation_blocks_simulation_and_draws_overlay() {
    let mut rig = Rig::new(EngineConfig::default().with_size(40, 60).with_orientation(Orientation::Portrait));
    rig.add("main", None);
    rig.engine.switch_scene("main");
    rig.engine.start();
    assert!(!rig.engine.is_blocked());

    rig.engine.resize(800, 400);
    assert!(rig.engine.is_blocked());
    rig.step(STEP);
    assert!(rig.record.borrow().updates.is_empty());
    // white rect dimmed by the 85% black overlay
    let (r, _, _) = rig.pixel(2, 2);
    assert!(r < 60, "overlay missing: {r}");

    rig.clock.advance(Duration::from_secs(3));
    rig.engine.resize(400, 800);
    assert!(!rig.engine.is_blocked());
    let ft = rig.engine.frame().unwrap();
    assert!(ft.raw_dt < 1e-3);
    assert_eq!(rig.record.borrow().updates.len(), 1);
}

#[test]
fn fps_readout_is_drawn_when_enabled() {
    let mut rig = Rig::new(EngineConfig::default().with_size(80, 80).with_background(Color::WHITE).with_show_fps(true));
    rig.engine.start();
    rig.step(STEP);
    assert!(rig.pixel(60, 18).0 < 255);
    assert_eq!(rig.pixel(70, 30), (255, 255, 255));
}

#[test]
fn pointer_positions_are_converted_to_logical() {
    let mut rig = Rig::new(EngineConfig::default().with_size(100, 100));
    rig.engine.resize(300, 200);
    // fit: 200x200 centred at x offset 50, scale 2
    rig.engine.handle_input(InputEvent::PointerMoved { pos: Vec2::new(150.0, 100.0) });
    assert_eq!(rig.engine.input().mouse_pos(), Vec2::new(50.0, 50.0));
}

#[test]
fn first_gesture_unlocks_audio_once() {
    let mut rig = Rig::small();
    assert!(!rig.engine.audio_mut().is_unlocked());

    rig.engine.handle_input(InputEvent::PointerMoved { pos: Vec2::new(1.0, 1.0) });
    assert_eq!(rig.audio.borrow().silences, 0);

    let click = InputEvent::PointerButton { button: MouseButton::Left, state: KeyState::Pressed, pos: Vec2::ZERO };
    rig.engine.handle_input(click.clone());
    rig.engine.handle_input(click);
    assert_eq!(rig.audio.borrow().silences, 1);
    assert!(rig.engine.audio_mut().is_unlocked());

    rig.engine.audio_mut().tone(&Tone::new(440.0));
    assert_eq!(rig.audio.borrow().tones, 1);
}

#[test]
fn engine_tweens_advance_with_frames() {
    let mut rig = Rig::small();
    rig.engine.start();

    let target = Rc::new(RefCell::new(HashMap::from([("x".to_string(), 0.0_f32)])));
    let fired = Rc::new(Cell::new(0));
    let f = fired.clone();
    rig.engine.tween(&target, &[("x", 10.0)], 0.1, "linear", Some(Box::new(move || f.set(f.get() + 1))));

    for _ in 0..3 {
        rig.step(0.04);
    }
    assert_relative_eq!(target.borrow()["x"], 10.0);
    assert_eq!(fired.get(), 1);
    rig.step(0.04);
    assert_eq!(fired.get(), 1);
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn manifest_load_omits_failures_and_reports_progress() {
    let fetcher = MemoryFetcher::new().with_file("hero.png", png_bytes());
    let mut rig = Rig::with_fetcher(EngineConfig::default().with_size(40, 40), fetcher);
    rig.engine.start();

    let manifest = AssetManifest::new()
        .with_image("hero", "hero.png")
        .with_image("broken", "missing.png");

    let progress = Rc::new(RefCell::new(Vec::<Progress>::new()));
    let bag_out = Rc::new(RefCell::new(None));
    let (p, b) = (progress.clone(), bag_out.clone());
    rig.engine.load(&manifest, move |pr| p.borrow_mut().push(pr), move |bag, _engine| *b.borrow_mut() = Some(bag));

    for _ in 0..500 {
        if bag_out.borrow().is_some() {
            break;
        }
        std::thread::sleep(Duration::from_millis(2));
        rig.step(STEP);
    }

    let bag = bag_out.borrow_mut().take().expect("load never completed");
    assert!(bag.images.contains_key("hero"));
    assert!(!bag.images.contains_key("broken"));
    assert_eq!(bag.images["hero"].width(), 2);

    let progress = progress.borrow();
    assert_eq!(progress.len(), 2);
    assert_eq!(progress.last().map(|p| p.ratio()), Some(1.0));
    assert!(rig.engine.load_progress().is_none());
}

#[test]
fn empty_manifest_completes_immediately() {
    let mut rig = Rig::small();
    let done = Rc::new(Cell::new(false));
    let d = done.clone();
    rig.engine.load(&AssetManifest::new(), |_| {}, move |bag, engine| {
        assert!(bag.images.is_empty() && bag.sounds.is_empty());
        assert!(!engine.is_running());
        d.set(true);
    });
    assert!(done.get());
}

/// Takes a while and then fails, so a load stays in flight across a frame.
struct SlowFetcher;

impl Fetch for SlowFetcher {
    fn fetch(&self, url: &str) -> std::io::Result<Vec<u8>> {
        std::thread::sleep(Duration::from_millis(300));
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, url.to_string()))
    }
}

#[test]
fn loading_bar_shows_while_no_scene_is_active() {
    let clock = ManualClock::new();
    let mut engine = Engine::builder(EngineConfig::default().with_size(100, 100))
        .clock(clock.clone())
        .fetcher(Arc::new(SlowFetcher))
        .audio_backend(Box::new(|| Err(AudioError::Unavailable)))
        .build();
    engine.start();
    engine.load(&AssetManifest::new().with_image("hero", "hero.png"), |_| {}, |_, _| {});

    engine.frame();
    let p = engine.surface().pixel(2, 2).unwrap();
    assert_eq!((p.r, p.g, p.b), (26, 26, 46));
    assert_eq!(engine.load_progress().map(|p| p.total), Some(1));
}
