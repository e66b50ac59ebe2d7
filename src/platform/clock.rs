//! Frame clock and pacing
//!
//! Measures elapsed time since the run started, derives an average
//! frames-per-second figure, and sleeps away whatever is left of the
//! frame budget after rendering.

use std::time::{Duration, Instant};

/// Millisecond time source plus the ability to block the calling thread
pub trait TimeSource {
    /// Milliseconds since some fixed origin (monotonic)
    fn now_ms(&self) -> f64;

    /// Block for `duration`
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock time measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Timing figures for the frame that just started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElapsedInfo {
    /// Time since the previous frame started
    pub delta_ms: f64,
    /// Time since the clock was created
    pub elapsed_ms: f64,
    /// Average frames per second over the whole run
    pub fps: f32,
}

/// Average frame rate; zero when no time has elapsed yet
pub fn fps(frames_elapsed: f32, elapsed_ms: f64) -> f32 {
    if elapsed_ms > 0.0 {
        (frames_elapsed as f64 / (elapsed_ms / 1000.0)) as f32
    } else {
        0.0
    }
}

/// Per-run frame counter and timestamps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    frames_elapsed: f32,
    initial_timestamp: f64,
    previous_frame_timestamp: f64,
}

impl FrameClock {
    pub fn new(now_ms: f64) -> Self {
        Self {
            frames_elapsed: 0.0,
            initial_timestamp: now_ms,
            previous_frame_timestamp: now_ms,
        }
    }

    pub fn frames_elapsed(&self) -> f32 {
        self.frames_elapsed
    }

    /// Count a new frame starting at `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> ElapsedInfo {
        self.frames_elapsed += 1.0;
        let delta_ms = now_ms - self.previous_frame_timestamp;
        let elapsed_ms = now_ms - self.initial_timestamp;
        self.previous_frame_timestamp = now_ms;

        ElapsedInfo {
            delta_ms,
            elapsed_ms,
            fps: fps(self.frames_elapsed, elapsed_ms),
        }
    }

    /// Time left in this frame's budget, if any
    pub fn remaining_budget(&self, target_fps: u32, now_ms: f64) -> Option<Duration> {
        let budget_ms = 1000.0 / target_fps as f64;
        let spent_ms = now_ms - self.previous_frame_timestamp;
        let remaining_ms = budget_ms - spent_ms;
        (remaining_ms > 0.0)
            .then(|| Duration::from_nanos((remaining_ms * 1_000_000.0).round() as u64))
    }

    /// Sleep out the rest of the frame budget. Returns how long it slept.
    pub fn throttle<T: TimeSource + ?Sized>(&self, target_fps: u32, time: &mut T) -> Duration {
        match self.remaining_budget(target_fps, time.now_ms()) {
            Some(wait) => {
                time.sleep(wait);
                wait
            }
            None => Duration::ZERO,
        }
    }
}
