//! Wall-clock frame timing

use std::time::{Duration, Instant};

/// Measures the real time between loop iterations
#[derive(Debug, Clone)]
pub struct Time {
    start: Instant,
    last: Instant,
    delta: Duration,
    frames: u64,
}

impl Time {
    /// Start measuring; `initial_delta` stands in for the first frame
    pub fn new(initial_delta: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            delta: initial_delta,
            frames: 0,
        }
    }

    /// Measure the time since the previous tick and make it the current delta
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        self.delta = now - self.last;
        self.last = now;
        self.frames += 1;
        self.delta
    }

    /// Duration of the last measured iteration
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Last delta in seconds
    pub fn delta_secs(&self) -> f64 {
        self.delta.as_secs_f64()
    }

    /// Time since creation
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
