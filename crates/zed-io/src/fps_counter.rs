use std::time::{Duration, Instant};

/// A frame rate counter over fixed reporting windows.
///
/// Frames are counted until `window` has elapsed; the counter then yields the average rate of
/// that window and starts a new one.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use zed_io::fps_counter::FpsCounter;
///
/// let mut fps_counter = FpsCounter::new(Duration::from_secs(1));
///
/// for _ in 0..100 {
///    if let Some(fps) = fps_counter.update() {
///        println!("{fps:.1} fps");
///    }
/// }
/// ```
pub struct FpsCounter {
    window: Duration,
    window_start: Instant,
    frame_count: u32,
    fps: f32,
}

impl FpsCounter {
    /// Creates a new `FpsCounter` reporting once per `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            window_start: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    /// Returns the rate of the last completed window, 0 before the first one.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Counts one frame. Returns the window's rate when the window just closed.
    pub fn update(&mut self) -> Option<f32> {
        self.update_at(Instant::now())
    }

    fn update_at(&mut self, now: Instant) -> Option<f32> {
        self.frame_count += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window || elapsed.is_zero() {
            return None;
        }

        self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
        self.frame_count = 0;
        self.window_start = now;

        Some(self.fps)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
