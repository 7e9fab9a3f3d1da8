//! Lantern demo: a title screen and a tiny runner that exercises input actions,
//! camera follow and shake, tweens, collision and procedural tones.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use lantern_engine::audio::{Tone, Waveform};
use lantern_engine::camera::FollowOptions;
use lantern_engine::collide;
use lantern_engine::coords::{Circle, Rect, Vec2};
use lantern_engine::device::GpuInit;
use lantern_engine::draw::{Canvas, DrawOpts, TextStyle};
use lantern_engine::logging::{init_logging, LoggingConfig};
use lantern_engine::paint::Color;
use lantern_engine::window::Runtime;
use lantern_engine::{Engine, EngineConfig, Scene, SceneCtx};

const GROUND_Y: f32 = 560.0;
const PLAYER_SIZE: f32 = 24.0;
const GRAVITY: f32 = 1800.0;
const JUMP_SPEED: f32 = 720.0;
const RUN_SPEED: f32 = 220.0;
const WORLD_WIDTH: f32 = 2400.0;

struct Title {
    blink: f32,
}

impl Scene for Title {
    fn update(&mut self, ctx: &mut SceneCtx<'_>, dt: f32) {
        self.blink = (self.blink + dt) % 1.0;
        if ctx.input.just_pressed("enter") || ctx.input.just_pressed("jump") {
            ctx.audio.tone(&Tone::new(660.0).with_waveform(Waveform::Square).with_volume(0.2));
            ctx.switch_scene("run");
        }
    }

    fn draw(&self, canvas: &mut Canvas<'_>) {
        let size = canvas.size();
        canvas.text_screen("LANTERN", size.x * 0.5, size.y * 0.35, &TextStyle::sized(36.0).centered());
        if self.blink < 0.6 {
            canvas.text_screen("PRESS ENTER", size.x * 0.5, size.y * 0.55, &TextStyle::sized(16.0).centered());
        }
    }
}

struct Run {
    player: Rc<RefCell<Vec2>>,
    velocity_y: f32,
    coins: Vec<Vec2>,
    banner: Rc<RefCell<Vec2>>,
    score: u32,
}

impl Run {
    fn new() -> Self {
        Self {
            player: Rc::new(RefCell::new(Vec2::new(40.0, GROUND_Y - PLAYER_SIZE))),
            velocity_y: 0.0,
            coins: Vec::new(),
            banner: Rc::new(RefCell::new(Vec2::new(0.0, -40.0))),
            score: 0,
        }
    }

    fn on_ground(&self) -> bool {
        self.player.borrow().y >= GROUND_Y - PLAYER_SIZE
    }
}

impl Scene for Run {
    fn on_enter(&mut self, ctx: &mut SceneCtx<'_>) {
        *self.player.borrow_mut() = Vec2::new(40.0, GROUND_Y - PLAYER_SIZE);
        self.velocity_y = 0.0;
        self.score = 0;
        self.coins = (0..12)
            .map(|i| Vec2::new(200.0 + i as f32 * 180.0, ctx.rng.random_range(430.0, 530.0)))
            .collect();

        let view = ctx.config.width as f32;
        ctx.camera.follow(
            &self.player,
            FollowOptions::default()
                .with_bounds(Vec2::ZERO, Vec2::new(WORLD_WIDTH.max(view), ctx.config.height as f32))
                .with_lerp(0.15),
        );

        *self.banner.borrow_mut() = Vec2::new(0.0, -40.0);
        ctx.tweens.tween(&self.banner, &[("y", 16.0)], 0.6, "bounce", None);
    }

    fn update(&mut self, ctx: &mut SceneCtx<'_>, dt: f32) {
        if ctx.input.just_pressed("pause") {
            ctx.pause();
            return;
        }

        let mut dx = 0.0;
        if ctx.input.is_down("left") {
            dx -= RUN_SPEED * dt;
        }
        if ctx.input.is_down("right") {
            dx += RUN_SPEED * dt;
        }

        if ctx.input.just_pressed("jump") && self.on_ground() {
            self.velocity_y = -JUMP_SPEED;
            ctx.audio.tone(&Tone::new(440.0).with_waveform(Waveform::Triangle).with_duration(0.12));
        }

        self.velocity_y += GRAVITY * dt;
        {
            let mut p = self.player.borrow_mut();
            p.x = (p.x + dx).clamp(0.0, WORLD_WIDTH - PLAYER_SIZE);
            p.y = (p.y + self.velocity_y * dt).min(GROUND_Y - PLAYER_SIZE);
        }
        if self.on_ground() {
            self.velocity_y = 0.0;
        }

        let p = *self.player.borrow();
        let body = Rect::new(p.x, p.y, PLAYER_SIZE, PLAYER_SIZE);
        let before = self.coins.len();
        self.coins.retain(|c| !collide::circle_rect(Circle::new(c.x, c.y, 8.0), body));
        let taken = before - self.coins.len();
        if taken > 0 {
            self.score += taken as u32;
            ctx.camera.shake(4.0, 0.2);
            ctx.audio.tone(&Tone::new(880.0 + ctx.rng.random_range(0.0, 220.0)).with_volume(0.25));
        }
    }

    fn paused(&mut self, ctx: &mut SceneCtx<'_>) {
        if ctx.input.just_pressed("pause") {
            ctx.resume();
        }
    }

    fn draw(&self, canvas: &mut Canvas<'_>) {
        canvas.rect(0.0, GROUND_Y, WORLD_WIDTH, 80.0, Color::rgb(0.2, 0.25, 0.3), DrawOpts::default());

        for c in &self.coins {
            canvas.circle(c.x, c.y, 8.0, Color::rgb(1.0, 0.85, 0.2), DrawOpts::default());
        }

        let p = *self.player.borrow();
        canvas.rect(p.x, p.y, PLAYER_SIZE, PLAYER_SIZE, Color::rgb(0.3, 0.7, 1.0), DrawOpts::default());

        let banner = *self.banner.borrow();
        let width = canvas.size().x;
        canvas.text_screen(&format!("SCORE {}", self.score), width * 0.5, banner.y, &TextStyle::sized(18.0).centered());
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = EngineConfig::default()
        .with_title("lantern demo")
        .with_background(Color::rgb(0.06, 0.07, 0.1))
        .with_show_fps(true);

    let mut engine = Engine::new(config);
    engine.add_scene("title", Title { blink: 0.0 });
    engine.add_scene("run", Run::new());
    engine.switch_scene("title");
    engine.start();

    Runtime::run(engine, GpuInit::default())
}
