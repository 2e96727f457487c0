//! Frame clock for the redraw-driven loop.

use std::time::{Duration, Instant};

/// Tracks per-frame timing. The show runs one simulation step per display refresh,
/// so this only measures; it never paces.
#[derive(Debug)]
pub struct Time {
    /// Time when the clock started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Frames and time accumulated since the last `take_average_fps`.
    window_frames: u32,
    window_time: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            window_frames: 0,
            window_time: Duration::ZERO,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        self.advance_to(Instant::now());
    }

    /// Advance to an explicit instant. Instants earlier than the last frame count as zero-length frames.
    pub fn advance_to(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now.max(self.last_frame);
        self.elapsed = self.last_frame - self.start_time;
        self.frame_count += 1;
        self.window_frames += 1;
        self.window_time += self.delta;
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Total elapsed time since start. This is the `now` fed to the simulation.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average FPS since the previous call, resetting the window.
    pub fn take_average_fps(&mut self) -> f32 {
        let secs = self.window_time.as_secs_f32();
        let fps = if secs > 0.0 {
            self.window_frames as f32 / secs
        } else {
            0.0
        };
        self.window_frames = 0;
        self.window_time = Duration::ZERO;
        fps
    }
}
