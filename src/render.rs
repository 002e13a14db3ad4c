//! Fixed cadence render loop
//!
//! One tick runs Stepping, Compositing, Submitting and Resetting in that
//! order. Submitting hands the frame to the output thread through a single
//! slot channel and blocks while the previous frame is still being sent.

use crate::colors::Rgb;
use crate::params::{ParamStore, BRIGHTNESS_VAR};
use crate::scene::Scene;
use crate::viz::{Animation, FrameContext};
use std::sync::mpsc::SyncSender;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Ticks between FPS reports
pub const FPS_REPORT_EVERY: u64 = 1000;

/// One frame for the output stage: every slot in wire order plus brightness
#[derive(Clone, Debug, PartialEq)]
pub struct RenderFrame {
    pub colors: Vec<Rgb>,
    pub brightness: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Stepping,
    Compositing,
    Submitting,
    Resetting,
}

/// Average frame rate over fixed size windows of ticks
pub struct FpsCounter {
    every: u64,
    ticks: u64,
    window_start: Instant,
}

impl FpsCounter {
    pub fn new(every: u64, now: Instant) -> Self {
        Self { every: every.max(1), ticks: 0, window_start: now }
    }

    /// Count one tick; returns the average rate when a window completes
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        self.ticks += 1;
        if self.ticks < self.every {
            return None;
        }
        let secs = now.duration_since(self.window_start).as_secs_f64();
        self.ticks = 0;
        self.window_start = now;
        if secs > 0.0 {
            Some(self.every as f64 / secs)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Submitted,
    /// The output stage has gone away; no further frames can be delivered
    Disconnected,
}

pub struct Renderer {
    scene: Scene,
    animation: Box<dyn Animation>,
    params: ParamStore,
    frames: SyncSender<RenderFrame>,
    phase: Phase,
    frame: u64,
    started: Instant,
    last: Instant,
    fps: FpsCounter,
}

impl Renderer {
    pub fn new(scene: Scene, animation: Box<dyn Animation>, params: ParamStore, frames: SyncSender<RenderFrame>) -> Self {
        let now = Instant::now();
        Self {
            scene,
            animation,
            params,
            frames,
            phase: Phase::Idle,
            frame: 0,
            started: now,
            last: now,
            fps: FpsCounter::new(FPS_REPORT_EVERY, now),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> TickOutcome {
        let ctx = FrameContext {
            elapsed: now.duration_since(self.started).as_secs_f64(),
            delta: now.duration_since(self.last).as_secs_f64(),
            frame: self.frame,
            params: &self.params,
        };
        self.last = now;

        self.phase = Phase::Stepping;
        self.animation.step(&mut self.scene, &ctx);

        self.phase = Phase::Compositing;
        self.animation.composite(&mut self.scene, &ctx);

        self.phase = Phase::Submitting;
        let frame = RenderFrame {
            colors: self.scene.pixels.colors(),
            brightness: clamp_brightness(self.params.get_var(BRIGHTNESS_VAR)),
        };
        if self.frames.send(frame).is_err() {
            self.phase = Phase::Idle;
            return TickOutcome::Disconnected;
        }

        self.phase = Phase::Resetting;
        self.scene.pixels.reset();
        self.frame += 1;

        if let Some(fps) = self.fps.tick(now) {
            info!(fps = %format!("{:.1}", fps), frame = self.frame, animation = self.animation.name(), "render rate");
        }
        TickOutcome::Submitted
    }

    /// Tick until the output stage disconnects. `fps` of 0 disables pacing.
    pub fn run(&mut self, fps: f64) {
        let period = frame_period(fps);
        info!(animation = self.animation.name(), fps, "render loop started");
        loop {
            let tick_start = Instant::now();
            if self.tick() == TickOutcome::Disconnected {
                debug!(frame = self.frame, "output closed, stopping render loop");
                return;
            }
            if let Some(period) = period {
                let spent = tick_start.elapsed();
                if spent < period {
                    thread::sleep(period - spent);
                }
            }
        }
    }
}

/// Time budget of one tick at `fps`. Rates too small to express as a
/// `Duration` run unpaced.
fn frame_period(fps: f64) -> Option<Duration> {
    if fps.is_nan() || fps <= 0.0 {
        return None;
    }
    match Duration::try_from_secs_f64(1.0 / fps) {
        Ok(period) => Some(period),
        Err(e) => {
            warn!(fps, error = %e, "frame rate out of range, running unpaced");
            None
        }
    }
}

/// Brightness as submitted: clamped into [0, 1], NaN reads as off
fn clamp_brightness(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
