use std::time::Instant;

/// Smoothing factor of the displayed FPS moving average.
const FPS_ALPHA: f32 = 0.1;
const FPS_BASELINE: f32 = 60.0;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Unclamped time since the previous tick, in seconds.
    pub raw_dt: f32,

    /// Delta handed to simulation: `min(raw_dt, max_delta_time)`.
    pub dt: f32,

    /// Smoothed frames-per-second estimate.
    pub fps: f32,

    /// Timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Cooperative frame loop state.
///
/// The host calls `tick` once per presented frame while `frame_requested` is true.
/// Pausing or orientation-blocking stops simulation but not rendering; the
/// scheduler only answers whether the simulation step should run.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    running: bool,
    paused: bool,
    blocked: bool,
    last: Option<Instant>,
    max_dt: f32,
    fps: f32,
    frame_index: u64,
}

impl FrameScheduler {
    pub fn new(max_delta_time: f32) -> Self {
        Self {
            running: false,
            paused: false,
            blocked: false,
            last: None,
            max_dt: max_delta_time.max(0.0),
            fps: FPS_BASELINE,
            frame_index: 0,
        }
    }

    /// Begins the loop. Returns `false` when it was already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.last = Some(now);
        log::info!("frame loop started");
        true
    }

    /// Halts the loop and drops the pending frame request.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("frame loop stopped");
        }
        self.running = false;
        self.last = None;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes simulation and rebases the clock so the next delta is ~0.
    pub fn resume(&mut self, now: Instant) {
        self.paused = false;
        if self.running {
            self.last = Some(now);
        }
    }

    /// Blocks or unblocks simulation (orientation mismatch). Lifting a block rebases
    /// the clock the same way `resume` does.
    pub fn set_blocked(&mut self, blocked: bool, now: Instant) {
        if self.blocked && !blocked && self.running {
            self.last = Some(now);
        }
        self.blocked = blocked;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Whether the host should schedule another frame callback.
    #[inline]
    pub fn frame_requested(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn should_simulate(&self) -> bool {
        self.running && !self.paused && !self.blocked
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn max_delta_time(&self) -> f32 {
        self.max_dt
    }

    /// Advances the loop. Returns `None` when the loop is not running.
    pub fn tick(&mut self, now: Instant) -> Option<FrameTime> {
        if !self.running {
            return None;
        }

        let last = self.last.unwrap_or(now);
        let raw_dt = now.saturating_duration_since(last).as_secs_f32();
        self.last = Some(now);

        let dt = raw_dt.min(self.max_dt);

        let instant = if raw_dt > 0.0 { 1.0 / raw_dt } else { FPS_BASELINE };
        self.fps = self.fps * (1.0 - FPS_ALPHA) + instant * FPS_ALPHA;

        let ft = FrameTime {
            raw_dt,
            dt,
            fps: self.fps,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);

        Some(ft)
    }
}
