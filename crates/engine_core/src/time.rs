//! Time management for the game loop.

use std::time::{Duration, Instant};

/// Smallest usable frame delta in seconds. Shorter (or negative) deltas are
/// clamped up to this so speed-normalized coefficients never divide by zero.
pub const MIN_DELTA_SECONDS: f32 = 1e-4;

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time when the engine started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Frames counted in the current FPS window.
    fps_frames: u32,
    /// Accumulated time in the current FPS window.
    fps_window: Duration,
    /// FPS averaged over the last completed one-second window.
    fps_smoothed: f32,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fps_frames: 0,
            fps_window: Duration::ZERO,
            fps_smoothed: 0.0,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.elapsed = now - self.start_time;
        self.frame_count += 1;

        self.fps_frames += 1;
        self.fps_window += self.delta;
        if self.fps_window >= Duration::from_secs(1) {
            self.fps_smoothed = self.fps_frames as f32 / self.fps_window.as_secs_f32();
            self.fps_frames = 0;
            self.fps_window = Duration::ZERO;
        }
    }

    /// Get the delta time in seconds, floored to [`MIN_DELTA_SECONDS`].
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32().max(MIN_DELTA_SECONDS)
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// FPS averaged over the last completed one-second window.
    pub fn fps(&self) -> f32 {
        self.fps_smoothed
    }
}
