//! Frame timing utilities.
//!
//! `Time` is produced once per frame by the runner's [`TimeClock`].  The
//! camera integrates with `Time::delta`; the physics step does not, it always
//! advances by [`crate::FIXED_TIMESTEP`].

use std::time::Instant;

/// A snapshot of timing information for the current frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    /// Seconds elapsed since the previous frame, clamped to 0.1 s.
    pub delta: f32,

    /// Unclamped seconds since the previous frame, for frame-rate reporting.
    pub raw_delta: f32,

    /// Total seconds elapsed since the clock was created.
    pub elapsed: f64,

    /// Number of frames ticked so far (0 for the first frame).
    pub frame_count: u64,
}

// ─── Clock (lives in the runner) ───────────────────────────────────────────

/// Stateful timer that produces [`Time`] snapshots.
pub struct TimeClock {
    start:       Instant,
    last_tick:   Instant,
    frame_count: u64,
}

impl TimeClock {
    /// Create a new clock, starting the epoch now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start:       now,
            last_tick:   now,
            frame_count: 0,
        }
    }

    /// Advance by one frame.  Returns the [`Time`] snapshot for this frame.
    pub fn tick(&mut self) -> Time {
        let now     = Instant::now();
        let raw     = (now - self.last_tick).as_secs_f32();
        let delta   = raw.min(0.1);
        let elapsed = (now - self.start).as_secs_f64();
        let count   = self.frame_count;

        self.last_tick    = now;
        self.frame_count += 1;

        Time { delta, raw_delta: raw, elapsed, frame_count: count }
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}

// ─── FPS counter ───────────────────────────────────────────────────────────

/// Averages frame times over a fixed window and reports once per window.
///
/// The runner feeds it every frame delta and writes the result into the
/// window title.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window:  f32,
    accum:   f32,
    frames:  u32,
    current: Option<f32>,
}

impl FpsCounter {
    pub fn new(window_secs: f32) -> Self {
        Self { window: window_secs.max(f32::EPSILON), accum: 0.0, frames: 0, current: None }
    }

    /// Record one frame.  Returns `Some(fps)` when a window has elapsed.
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.accum += delta;
        self.frames += 1;
        if self.accum < self.window {
            return None;
        }
        let fps = self.frames as f32 / self.accum;
        self.accum = 0.0;
        self.frames = 0;
        self.current = Some(fps);
        self.current
    }

    /// Last reported value, if a window has completed yet.
    pub fn current(&self) -> Option<f32> {
        self.current
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_reports_once_per_window() {
        let mut fps = FpsCounter::new(1.0);
        for _ in 0..3 {
            assert_eq!(fps.record(0.25), None);
        }
        assert_eq!(fps.record(0.25), Some(4.0));
        assert_eq!(fps.current(), Some(4.0));
        assert_eq!(fps.record(0.25), None);
    }

    #[test]
    fn clock_counts_frames_and_clamps_delta() {
        let mut clock = TimeClock::new();
        let first = clock.tick();
        let second = clock.tick();
        assert_eq!(first.frame_count, 0);
        assert_eq!(second.frame_count, 1);
        assert!(second.delta <= 0.1);
        assert!(second.elapsed >= first.elapsed);
    }

    #[test]
    fn stalled_frame_keeps_its_real_length() {
        let mut clock = TimeClock::new();
        std::thread::sleep(std::time::Duration::from_millis(150));
        let stalled = clock.tick();
        assert_eq!(stalled.delta, 0.1);
        assert!(stalled.raw_delta >= 0.15);

        // fed the real length, the stall reads as one slow frame
        let mut fps = FpsCounter::new(0.1);
        assert!(fps.record(stalled.raw_delta).unwrap() < 1.0 / 0.15 + 1e-3);
    }
}
