use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::Engine;
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::input::platform::WinitTranslator;
use crate::render::{Presenter, RenderCtx, RenderTarget};

/// Desktop host: one window, redraw-driven frame loop.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs `engine` until the window is closed.
    ///
    /// The engine is started if the caller has not started it already.
    pub fn run(engine: Engine, gpu_init: GpuInit) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(engine, gpu_init);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState {
    engine: Engine,
    gpu_init: GpuInit,
    translator: WinitTranslator,

    window: Option<WindowEntry>,
    presenter: Option<Presenter>,
    exit_requested: bool,
}

impl AppState {
    fn new(engine: Engine, gpu_init: GpuInit) -> Self {
        Self {
            engine,
            gpu_init,
            translator: WinitTranslator::new(),
            window: None,
            presenter: None,
            exit_requested: false,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let cfg = self.engine.config();
        let attrs = Window::default_attributes()
            .with_title(cfg.title.clone())
            .with_inner_size(LogicalSize::new(cfg.width as f64, cfg.height as f64));
        let (width, height, pixel_perfect) = (cfg.width, cfg.height, cfg.pixel_perfect);

        let window = event_loop.create_window(attrs).context("failed to create window")?;
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let presenter = entry.with_gpu(|gpu| {
            let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
            Presenter::new(&ctx, width, height, pixel_perfect)
        });

        let size = entry.with_window(|w| w.inner_size());
        self.engine.resize(size.width, size.height);

        self.window = Some(entry);
        self.presenter = Some(presenter);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(entry) = self.window.as_mut() {
            entry.with_gpu_mut(|gpu| gpu.resize(size));
            entry.with_window(|w| w.request_redraw());
        }
        self.engine.resize(size.width, size.height);
    }

    /// Uploads the engine surface and presents it letterboxed.
    fn present(&mut self) {
        let (Some(entry), Some(presenter)) = (self.window.as_mut(), self.presenter.as_ref()) else {
            return;
        };
        let engine = &self.engine;
        let mut fatal = false;

        entry.with_mut(|fields| {
            let mut frame = match fields.gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    fatal = fields.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal;
                    return;
                }
            };

            {
                let ctx = RenderCtx::new(fields.gpu.device(), fields.gpu.queue(), fields.gpu.surface_format());
                presenter.upload(&ctx, engine.surface());
                let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
                presenter.draw(&mut target, engine.display().fit());
            }

            fields.window.pre_present_notify();
            fields.gpu.submit(frame);
        });

        if fatal {
            log::error!("unrecoverable surface error; exiting");
            self.exit_requested = true;
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        self.engine.start();
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Stopping the engine drops the frame request; the last frame stays on screen.
        if self.engine.frame_requested() {
            if let Some(entry) = &self.window {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.engine.stop();
                self.window = None;
                self.presenter = None;
                self.exit_requested = true;
                event_loop.exit();
                return;
            }

            WindowEvent::Resized(size) => self.resize(*size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.engine.frame().is_some() {
                    self.present();
                }
            }

            _ => {}
        }

        if let Some(ev) = self.translator.translate(&event) {
            if self.engine.handle_input(ev) {
                log::trace!("default action suppressed for {event:?}");
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
