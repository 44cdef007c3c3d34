//! # Visible Time Window
//!
//! On a constrained (touch) viewport only a fixed-width slice of the timeline
//! is shown, centered on the playback position and clamped to the track; on
//! desktop the full duration is always visible. Drawing and drag
//! interpretation must share one mapping, so both go through [`TimeAxis`].

/// Width of the visible slice on constrained viewports, in seconds.
pub const MOBILE_VIEW_SECONDS: f64 = 30.0;

/// How much of the timeline the viewport shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    /// The whole track is always visible (desktop).
    Full,
    /// A fixed-width slice centered on the playback position (touch).
    Windowed { seconds: f64 },
}

impl ViewMode {
    /// The default constrained-viewport mode.
    pub fn windowed() -> Self {
        ViewMode::Windowed {
            seconds: MOBILE_VIEW_SECONDS,
        }
    }
}

/// The time↔pixel mapping for one frame: a visible `[start, end]` window in
/// seconds projected across `width` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    pub window_start: f64,
    pub window_end: f64,
    pub width: f32,
}

impl TimeAxis {
    /// Compute the visible window for the current mode and position.
    ///
    /// The windowed slice never extends past `[0, duration]`: near the track
    /// edges it pins to the edge instead of centering. An unknown duration
    /// (still loading) collapses the window to zero.
    pub fn compute(mode: ViewMode, duration: f64, position: f64, width: f32) -> Self {
        let (window_start, window_end) = match mode {
            ViewMode::Windowed { seconds } if seconds > 0.0 && duration > 0.0 => {
                let half = seconds / 2.0;
                let mut start = (position - half).max(0.0);
                let mut end = start + seconds;
                if end > duration {
                    end = duration;
                    start = (end - seconds).max(0.0);
                }
                (start, end)
            }
            _ => (0.0, duration),
        };
        Self {
            window_start,
            window_end,
            width,
        }
    }

    /// Window length in seconds, floored to keep the mapping finite.
    pub fn window_len(&self) -> f64 {
        (self.window_end - self.window_start).max(0.001)
    }

    /// Map a pixel column to a time within the window.
    pub fn x_to_time(&self, x: f32) -> f64 {
        if self.width <= 0.0 {
            return self.window_start;
        }
        self.window_start + (x as f64 / self.width as f64) * self.window_len()
    }

    /// Map a time to its pixel column.
    pub fn time_to_x(&self, time: f64) -> f32 {
        ((time - self.window_start) / self.window_len() * self.width as f64) as f32
    }
}
