use std::time::{Duration, Instant};

use crate::config::MIN_FRAME_RATE_CAP;

/// Frame-capped wall clock. `tick` sleeps out whatever is left of the target
/// interval and returns the real time since the previous tick.
#[derive(Debug)]
pub struct FrameClock {
    target: Duration,
    last: Instant,
    window_start: Instant,
    window_frames: u32,
    fps: f64,
}

impl FrameClock {
    /// Caps below [`MIN_FRAME_RATE_CAP`] (or NaN) are raised to it.
    pub fn new(frame_rate_cap: f64) -> Self {
        let now = Instant::now();
        let cap = frame_rate_cap.max(MIN_FRAME_RATE_CAP);
        Self {
            target: Duration::from_secs_f64(1.0 / cap),
            last: now,
            window_start: now,
            window_frames: 0,
            fps: 0.0,
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    pub fn tick(&mut self) -> Duration {
        let deadline = self.last + self.target();
        let now = Instant::now();
        if now < deadline {
            std::thread::sleep(deadline - now);
        }
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;

        self.window_frames += 1;
        let window = now - self.window_start;
        if window >= Duration::from_secs(1) {
            self.fps = self.window_frames as f64 / window.as_secs_f64();
            self.window_frames = 0;
            self.window_start = now;
        }
        elapsed
    }

    /// Frames per second over the last full one-second window.
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

/// Wall time to simulated time. A long stall (window drag, debugger) is
/// capped at `max_frame_ms` so one frame cannot blow up the integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timestep {
    pub time_dilation: f64,
    pub max_frame_ms: f64,
}

impl Timestep {
    pub fn dt_for(&self, elapsed: Duration) -> f64 {
        let ms = (elapsed.as_secs_f64() * 1000.0).min(self.max_frame_ms);
        ms / self.time_dilation
    }
}

/// Fires once per `interval` of accumulated simulated time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CullTimer {
    interval: f64,
    accumulated: f64,
}

impl CullTimer {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            accumulated: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) -> bool {
        self.accumulated += dt;
        if self.accumulated < self.interval {
            return false;
        }
        // One cull covers any backlog; no catch-up bursts.
        self.accumulated %= self.interval;
        true
    }
}
