//! Wall-clock frame pacing for the host loop.
//!
//! The engine steps in 60 Hz frame units; the host may render at a different
//! rate, so each frame's real elapsed time is converted into that unit.

use std::time::{Duration, Instant};

/// Milliseconds in one simulation frame unit.
pub const MS_PER_FRAME: f64 = 1000.0 / 60.0;

/// A long stall (debugger, suspended terminal) must not teleport entities.
pub const MAX_DT: f32 = 4.0;

/// Largest `dt` handed to a single engine step. Per-step travel must stay
/// inside the 20 px platform landing band.
pub const MAX_STEP: f32 = 1.0;

pub fn millis_to_dt(ms: f64) -> f32 {
    (ms / MS_PER_FRAME) as f32
}

pub fn dt_to_millis(dt: f32) -> f64 {
    dt as f64 * MS_PER_FRAME
}

/// Split a frame's `dt` into engine steps of at most `MAX_STEP`, in order.
/// Non-positive and NaN input yields no steps.
pub fn substeps(dt: f32) -> impl Iterator<Item = f32> {
    let dt = dt.max(0.0);
    let whole = (dt / MAX_STEP).floor() as usize;
    let rest = dt - whole as f32 * MAX_STEP;
    std::iter::repeat(MAX_STEP)
        .take(whole)
        .chain((rest > f32::EPSILON).then_some(rest))
}

pub struct FrameClock {
    frame: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        FrameClock {
            frame: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            last: Instant::now(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Time since the previous call, in frame units, capped at `MAX_DT`.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        millis_to_dt(elapsed.as_secs_f64() * 1000.0).min(MAX_DT)
    }

    /// Sleep off whatever remains of the current frame.
    pub fn wait(&self, frame_start: Instant) {
        let elapsed = frame_start.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
    }

    /// Forget time spent outside the loop (menus, pauses).
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}
