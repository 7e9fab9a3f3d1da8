use std::collections::HashMap;

use crate::draw::Canvas;
use crate::error::SceneError;

use super::ctx::{LoadDone, SceneCtx};

/// A unit of game flow. Every hook is optional.
pub trait Scene {
    /// Runs once, on first activation. Signal `done` when loading has finished;
    /// the default signals immediately.
    fn load(&mut self, ctx: &mut SceneCtx<'_>, done: LoadDone) {
        let _ = ctx;
        done.signal();
    }

    /// Called once per frame while this scene's load is outstanding.
    fn poll_load(&mut self, ctx: &mut SceneCtx<'_>) {
        let _ = ctx;
    }

    fn on_enter(&mut self, ctx: &mut SceneCtx<'_>) {
        let _ = ctx;
    }

    fn on_leave(&mut self, ctx: &mut SceneCtx<'_>) {
        let _ = ctx;
    }

    fn update(&mut self, ctx: &mut SceneCtx<'_>, dt: f32) {
        let _ = (ctx, dt);
    }

    /// Runs instead of `update` on frames where the engine is paused. Input is live,
    /// so this is where a scene watches for whatever should call `ctx.resume()`.
    fn paused(&mut self, ctx: &mut SceneCtx<'_>) {
        let _ = ctx;
    }

    fn draw(&self, canvas: &mut Canvas<'_>) {
        let _ = canvas;
    }
}

struct Entry {
    scene: Box<dyn Scene>,
    loaded: bool,
}

struct PendingLoad {
    name: String,
    done: LoadDone,
}

/// Registry of named scenes with at most one active.
#[derive(Default)]
pub struct SceneManager {
    scenes: HashMap<String, Entry>,
    active: Option<String>,
    loading: Option<PendingLoad>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `scene` under `name`, unloaded. Re-registering a name replaces it.
    pub fn add_scene(&mut self, name: impl Into<String>, scene: impl Scene + 'static) {
        self.add_boxed(name.into(), Box::new(scene));
    }

    pub fn add_boxed(&mut self, name: String, scene: Box<dyn Scene>) {
        if self.active.as_deref() == Some(name.as_str()) {
            log::warn!("replacing active scene '{name}'");
        }
        self.scenes.insert(name, Entry { scene, loaded: false });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.scenes.get(name).is_some_and(|e| e.loaded)
    }

    /// Activates `name`, loading it first if this is its first activation.
    ///
    /// Unknown names leave every piece of state untouched.
    ///
    /// A switch issued while an earlier load is outstanding supersedes it: the pending
    /// continuation is dropped, so the superseded scene is never entered when its load
    /// later signals. It stays marked loaded and the next switch to it enters at once.
    pub fn switch_scene(&mut self, name: &str, ctx: &mut SceneCtx<'_>) -> Result<(), SceneError> {
        let Some(entry) = self.scenes.get_mut(name) else {
            log::error!("switch to unknown scene '{name}'");
            return Err(SceneError::UnknownScene(name.to_string()));
        };

        if let Some(prev) = self.loading.take() {
            log::debug!("load of '{}' superseded by switch to '{name}'", prev.name);
        }

        if entry.loaded {
            self.enter(name, ctx);
            return Ok(());
        }

        entry.loaded = true;
        let done = LoadDone::new();
        log::debug!("loading scene '{name}'");
        entry.scene.load(ctx, done.clone());

        if done.is_signalled() {
            self.enter(name, ctx);
        } else {
            self.loading = Some(PendingLoad { name: name.to_string(), done });
        }
        Ok(())
    }

    /// Gives an outstanding load its turn and enters the scene once it has signalled.
    pub fn poll_pending(&mut self, ctx: &mut SceneCtx<'_>) {
        let Some(pending) = &self.loading else { return };
        let name = pending.name.clone();

        if !pending.done.is_signalled() {
            if let Some(entry) = self.scenes.get_mut(&name) {
                entry.scene.poll_load(ctx);
            }
        }

        if self.loading.as_ref().is_some_and(|p| p.done.is_signalled()) {
            self.loading = None;
            self.enter(&name, ctx);
        }
    }

    fn enter(&mut self, name: &str, ctx: &mut SceneCtx<'_>) {
        if let Some(prev) = self.active.take() {
            if let Some(entry) = self.scenes.get_mut(&prev) {
                log::debug!("leaving scene '{prev}'");
                entry.scene.on_leave(ctx);
            }
        }

        self.active = Some(name.to_string());
        ctx.camera.reset();

        if let Some(entry) = self.scenes.get_mut(name) {
            log::debug!("entering scene '{name}'");
            entry.scene.on_enter(ctx);
        }
    }

    pub fn update_active(&mut self, ctx: &mut SceneCtx<'_>, dt: f32) {
        if let Some(entry) = self.active.as_ref().and_then(|n| self.scenes.get_mut(n)) {
            entry.scene.update(ctx, dt);
        }
    }

    pub fn paused_active(&mut self, ctx: &mut SceneCtx<'_>) {
        if let Some(entry) = self.active.as_ref().and_then(|n| self.scenes.get_mut(n)) {
            entry.scene.paused(ctx);
        }
    }

    pub fn draw_active(&self, canvas: &mut Canvas<'_>) {
        if let Some(entry) = self.active.as_ref().and_then(|n| self.scenes.get(n)) {
            entry.scene.draw(canvas);
        }
    }
}
