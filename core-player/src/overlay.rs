//! # Inactivity Overlay Fade
//!
//! The contact affordance hides the moment the listener does anything and
//! fades back in after a second of quiet. This is a plain debounce against an
//! injected clock — the deadline is owned state, reset on every qualifying
//! event and cleared at teardown, independent of the render loop.

use std::time::{Duration, Instant};

/// Debounced visibility of the idle overlay.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use core_player::OverlayFade;
///
/// let mut overlay = OverlayFade::new(Duration::from_secs(1));
/// let t0 = Instant::now();
/// assert!(overlay.is_visible());
///
/// overlay.activity(t0);
/// assert!(!overlay.is_visible());
/// overlay.tick(t0 + Duration::from_secs(2));
/// assert!(overlay.is_visible());
/// ```
#[derive(Debug)]
pub struct OverlayFade {
    delay: Duration,
    visible: bool,
    deadline: Option<Instant>,
}

impl OverlayFade {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            visible: true,
            deadline: None,
        }
    }

    /// An activity signal: hide immediately and restart the quiet timer.
    pub fn activity(&mut self, now: Instant) {
        self.visible = false;
        self.deadline = Some(now + self.delay);
    }

    /// Advance the debounce; returns current visibility.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(deadline) = self.deadline {
            if now >= deadline {
                self.visible = true;
                self.deadline = None;
            }
        }
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Drop any pending deadline. Called at session teardown so no timer
    /// outlives the player.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for OverlayFade {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> Instant {
        Instant::now()
    }

    #[test]
    fn starts_visible() {
        assert!(OverlayFade::default().is_visible());
    }

    #[test]
    fn activity_hides_immediately() {
        let mut overlay = OverlayFade::default();
        overlay.activity(t0());
        assert!(!overlay.is_visible());
    }

    #[test]
    fn reappears_after_quiet_period() {
        let mut overlay = OverlayFade::default();
        let start = t0();
        overlay.activity(start);
        assert!(!overlay.tick(start + Duration::from_millis(999)));
        assert!(overlay.tick(start + Duration::from_millis(1000)));
    }

    #[test]
    fn repeated_activity_keeps_pushing_the_deadline() {
        let mut overlay = OverlayFade::default();
        let start = t0();
        overlay.activity(start);
        overlay.activity(start + Duration::from_millis(800));
        // 1.2 s after the first event but only 0.4 s after the second.
        assert!(!overlay.tick(start + Duration::from_millis(1200)));
        assert!(overlay.tick(start + Duration::from_millis(1800)));
    }

    #[test]
    fn cancel_clears_pending_deadline() {
        let mut overlay = OverlayFade::default();
        let start = t0();
        overlay.activity(start);
        overlay.cancel();
        // Without a deadline the overlay stays hidden forever: teardown,
        // nothing left to fade in.
        assert!(!overlay.tick(start + Duration::from_secs(10)));
    }
}
