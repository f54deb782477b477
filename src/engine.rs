//! Fixed timestep engine
//!
//! Decouples the simulation rate from the display rate. Each display frame
//! feeds the (clamped) wall-clock delta into an accumulator, drains it in
//! `FIXED_DT` steps through `FrameHooks::update`, then renders once.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::consts::{FIXED_DT, FPS_WINDOW_MS, MAX_FRAME_DT};

/// Millisecond time source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Waits for the next display frame opportunity
pub trait FrameScheduler {
    fn wait_next_frame(&mut self);
}

/// Sleeps a fixed interval between frames (native stand-in for vsync)
#[derive(Debug, Clone, Copy)]
pub struct SleepScheduler {
    pub interval: Duration,
}

impl SleepScheduler {
    pub fn from_hz(hz: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(hz.max(1))),
        }
    }
}

impl FrameScheduler for SleepScheduler {
    fn wait_next_frame(&mut self) {
        std::thread::sleep(self.interval);
    }
}

/// Per-frame callbacks driven by the engine
pub trait FrameHooks {
    /// One fixed simulation step of `dt` seconds
    fn update(&mut self, dt: f32);
    /// Called once per display frame after all updates
    fn render(&mut self);
}

/// Shared stop flag, usable from inside hooks while `Engine::run` is looping
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    running: Rc<Cell<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// Read side of the engine's FPS counter, for hooks that report it
#[derive(Debug, Clone, Default)]
pub struct FpsHandle {
    fps: Rc<Cell<u32>>,
}

impl FpsHandle {
    pub fn get(&self) -> u32 {
        self.fps.get()
    }
}

/// What a single display frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Fixed updates run this frame (0, 1 or more)
    pub steps: u32,
    /// Clamped frame delta (seconds)
    pub delta: f64,
}

pub struct Engine<C: Clock = SystemClock> {
    clock: C,
    running: StopHandle,
    last_frame_time: f64,
    accumulator: f64,
    // FPS tracking
    frame_count: u32,
    fps_window_start: f64,
    fps: FpsHandle,
}

impl Engine<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for Engine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Engine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            running: StopHandle::default(),
            last_frame_time: 0.0,
            accumulator: 0.0,
            frame_count: 0,
            fps_window_start: 0.0,
            fps: FpsHandle::default(),
        }
    }

    /// stopped -> running. No-op if already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let now = self.clock.now_ms();
        self.last_frame_time = now;
        self.fps_window_start = now;
        self.frame_count = 0;
        self.accumulator = 0.0;
        self.running.running.set(true);
        log::info!("Engine started");
    }

    /// running -> stopped. Takes effect before the next scheduled frame.
    pub fn stop(&mut self) {
        if self.is_running() {
            self.running.stop();
            log::info!("Engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    /// Handle that stops this engine from elsewhere (e.g. inside a hook)
    pub fn stop_handle(&self) -> StopHandle {
        self.running.clone()
    }

    /// Frames counted over the last complete one-second window
    pub fn fps(&self) -> u32 {
        self.fps.get()
    }

    /// Shared view of `fps()` that stays current while `run` is looping
    pub fn fps_handle(&self) -> FpsHandle {
        self.fps.clone()
    }

    /// Unconsumed simulation time (seconds)
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// The display frame callback. Returns `None` when stopped.
    pub fn frame(&mut self, hooks: &mut impl FrameHooks) -> Option<FrameReport> {
        if !self.is_running() {
            return None;
        }
        let now = self.clock.now_ms();
        let delta = ((now - self.last_frame_time) / 1000.0).clamp(0.0, MAX_FRAME_DT);
        self.last_frame_time = now;

        self.frame_count += 1;
        if now - self.fps_window_start >= FPS_WINDOW_MS {
            self.fps.fps.set(self.frame_count);
            self.frame_count = 0;
            self.fps_window_start = now;
        }

        let steps = self.advance(delta, hooks);
        Some(FrameReport { steps, delta })
    }

    /// Accumulate `delta` seconds, drain in fixed steps, then render once
    fn advance(&mut self, delta: f64, hooks: &mut impl FrameHooks) -> u32 {
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= FIXED_DT {
            hooks.update(FIXED_DT as f32);
            self.accumulator -= FIXED_DT;
            steps += 1;
        }

        hooks.render();
        steps
    }

    /// Start (if needed) and keep scheduling frames until stopped
    pub fn run(&mut self, hooks: &mut impl FrameHooks, scheduler: &mut impl FrameScheduler) {
        self.start();
        loop {
            scheduler.wait_next_frame();
            if self.frame(hooks).is_none() {
                break;
            }
        }
    }
}
