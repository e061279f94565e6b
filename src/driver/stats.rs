//! Frame rate bookkeeping

use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Frames-per-second over a rolling one-second window
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    window_start: Option<Instant>,
    frames_in_window: u32,
    fps: f32,
    total_frames: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a frame at `now`. Returns the new rate when a window closes.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.total_frames += 1;
        self.frames_in_window += 1;

        let start = *self.window_start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);
        if elapsed < FPS_WINDOW {
            return None;
        }
        self.fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
        self.frames_in_window = 0;
        self.window_start = Some(now);
        Some(self.fps)
    }

    /// Rate measured over the last completed window; 0 before the first
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_reported_once_per_window() {
        let mut stats = FrameStats::new();
        let start = Instant::now();

        // 60 frames spaced so the 61st lands exactly one second in
        for i in 0..60u64 {
            assert_eq!(stats.tick(start + Duration::from_micros(i * 16_667)), None);
        }
        let fps = stats.tick(start + Duration::from_secs(1)).unwrap();
        assert!((fps - 61.0).abs() < 0.01, "fps = {}", fps);
        assert_eq!(stats.fps(), fps);
        assert_eq!(stats.total_frames(), 61);

        assert_eq!(stats.tick(start + Duration::from_millis(1100)), None);
    }

    #[test]
    fn test_fps_zero_before_first_window() {
        let mut stats = FrameStats::new();
        stats.tick(Instant::now());
        assert_eq!(stats.fps(), 0.0);
    }
}
