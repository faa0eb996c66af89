//! Time management for the fixed-tick simulation loop.

use std::time::{Duration, Instant};

/// Upper bound on fixed ticks run for a single frame before the backlog is dropped.
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 5;

/// Accumulates variable frame time and hands out fixed simulation ticks.
///
/// The vehicle core is ticked synchronously, one `tick(dt)` per step; this
/// type decides how many of those steps a frame owes.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Fixed step length (default 60 Hz).
    step: Duration,
    /// Time not yet consumed by a tick.
    accumulator: Duration,
    /// Spiral-of-death guard.
    max_ticks_per_frame: u32,
    /// Total ticks handed out since creation.
    tick_count: u64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::from_hz(60.0)
    }
}

impl FixedTimestep {
    /// Create a timestep running at `hz` ticks per second. Non-positive rates fall back to 60 Hz.
    pub fn from_hz(hz: f64) -> Self {
        let hz = if hz.is_finite() && hz > 0.0 { hz } else { 60.0 };
        Self {
            step: Duration::from_secs_f64(1.0 / hz),
            accumulator: Duration::ZERO,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
            tick_count: 0,
        }
    }

    pub fn with_max_ticks_per_frame(mut self, max: u32) -> Self {
        self.max_ticks_per_frame = max.max(1);
        self
    }

    /// Get the fixed step in seconds.
    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Total number of ticks handed out.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Add a frame's worth of elapsed time and return how many fixed ticks to run.
    ///
    /// Backlog beyond `max_ticks_per_frame` is discarded.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulator += frame_time;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if self.accumulator >= self.step {
            log::debug!(
                "Dropping {:.1} ms of simulation backlog",
                self.accumulator.as_secs_f64() * 1000.0
            );
            self.accumulator = Duration::ZERO;
        }
        self.tick_count += u64::from(ticks);
        ticks
    }
}

/// Wall clock for a run of the fixed-tick loop.
#[derive(Debug)]
pub struct FrameClock {
    start_time: Instant,
    last_frame: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
        }
    }

    /// Time elapsed since the previous call (or since creation).
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }
}
