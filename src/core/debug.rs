//! Frame statistics and debug level

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

const WINDOW: Duration = Duration::from_secs(1);

/// Frame-time history plus one-second FPS and UPS windows
#[derive(Debug)]
pub struct FrameStats {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    avg_frame_time_ms: f64,
    min_frame_time_ms: f64,
    max_frame_time_ms: f64,
    total_frames: u64,
    total_updates: u64,

    window_elapsed: Duration,
    window_frames: u32,
    window_updates: u32,
    fps: f64,
    ups: f64,
}

impl FrameStats {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            avg_frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            total_frames: 0,
            total_updates: 0,
            window_elapsed: Duration::ZERO,
            window_frames: 0,
            window_updates: 0,
            fps: 0.0,
            ups: 0.0,
        }
    }

    /// Count one simulation update in the current window
    pub fn record_update(&mut self) {
        self.total_updates += 1;
        self.window_updates += 1;
    }

    /// Record a finished loop iteration that lasted `delta`
    pub fn record_frame(&mut self, delta: Duration) {
        self.total_frames += 1;
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);
        self.update_history();

        self.window_frames += 1;
        self.window_elapsed += delta;
        if self.window_elapsed >= WINDOW {
            let secs = self.window_elapsed.as_secs_f64();
            self.fps = f64::from(self.window_frames) / secs;
            self.ups = f64::from(self.window_updates) / secs;
            self.window_elapsed = Duration::ZERO;
            self.window_frames = 0;
            self.window_updates = 0;
        }
    }

    fn update_history(&mut self) {
        let Some(&first) = self.frame_times.front() else {
            return;
        };
        let (mut total, mut min, mut max) = (Duration::ZERO, first, first);
        for &dt in &self.frame_times {
            total += dt;
            min = min.min(dt);
            max = max.max(dt);
        }
        self.avg_frame_time_ms = total.as_secs_f64() * 1000.0 / self.frame_times.len() as f64;
        self.min_frame_time_ms = min.as_secs_f64() * 1000.0;
        self.max_frame_time_ms = max.as_secs_f64() * 1000.0;
    }

    /// Frames per second over the last complete window
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Updates per second over the last complete window
    pub fn ups(&self) -> f64 {
        self.ups
    }

    /// Average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f64 {
        self.avg_frame_time_ms
    }

    /// Total frames recorded
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Total updates recorded
    pub fn total_updates(&self) -> u64 {
        self.total_updates
    }

    /// Display-ready values, keyed by name
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (String::from("fps"), format!("{:.1}", self.fps)),
            (String::from("ups"), format!("{:.1}", self.ups)),
            (String::from("frame_ms"), format!("{:.2}", self.avg_frame_time_ms)),
            (
                String::from("frame_ms_range"),
                format!("{:.2}-{:.2}", self.min_frame_time_ms, self.max_frame_time_ms),
            ),
            (String::from("frames"), self.total_frames.to_string()),
            (String::from("updates"), self.total_updates.to_string()),
        ])
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Highest overlay level
pub const MAX_DEBUG_LEVEL: u8 = 4;

/// Debug overlay settings and stats
#[derive(Debug, Default)]
pub struct DebugInfo {
    level: u8,
    /// Frame statistics
    pub stats: FrameStats,
    lines: Vec<String>,
}

impl DebugInfo {
    /// Create debug info at `level`
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(MAX_DEBUG_LEVEL),
            stats: FrameStats::new(),
            lines: Vec::new(),
        }
    }

    /// Overlay level, 0 (off) to 4
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Change the level (clamped)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(MAX_DEBUG_LEVEL);
    }

    /// Next level, wrapping from 4 back to 0
    pub fn cycle(&mut self) -> u8 {
        self.level = (self.level + 1) % (MAX_DEBUG_LEVEL + 1);
        self.level
    }

    /// Whether the overlay is on
    pub fn enabled(&self) -> bool {
        self.level > 0
    }

    /// Add a custom line to the overlay
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Remove custom lines
    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }

    /// Custom lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_windows() {
        let mut stats = FrameStats::new();
        for i in 0..60 {
            if i % 2 == 0 {
                stats.record_update();
            }
            stats.record_frame(Duration::from_micros(16_667));
        }
        assert!((stats.fps() - 60.0).abs() < 0.1);
        assert!((stats.ups() - 30.0).abs() < 0.1);

        let map = stats.to_map();
        assert_eq!(map["fps"], "60.0");
        assert_eq!(map["frames"], "60");
        assert_eq!(map["updates"], "30");
    }

    #[test]
    fn test_no_rate_before_first_window() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(20));
        assert_eq!(stats.fps(), 0.0);
        assert!((stats.avg_frame_time_ms() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_debug_level_cycles() {
        let mut debug = DebugInfo::new(9);
        assert_eq!(debug.level(), 4);
        assert_eq!(debug.cycle(), 0);
        assert!(!debug.enabled());
        assert_eq!(debug.cycle(), 1);
        assert!(debug.enabled());
    }
}
