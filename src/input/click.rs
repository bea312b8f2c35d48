use glam::Vec2;
use web_time::{Duration, Instant};

const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);
/// Presses that travel further than this before release are drags.
const CLICK_SLOP: f32 = 4.0;

/// Detects double clicks from press / release pairs for platforms that do
/// not report them natively.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    press: Option<Vec2>,
    last_click: Option<(Instant, Vec2)>,
}

impl ClickTracker {
    /// Tracker with no click history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a primary button press.
    pub fn press(&mut self, position: Vec2) {
        self.press = Some(position);
    }

    /// Record a release now. Returns true when it completes a double click.
    pub fn release(&mut self, position: Vec2) -> bool {
        self.release_at(position, Instant::now())
    }

    /// Record a release at `now`.
    pub fn release_at(&mut self, position: Vec2, now: Instant) -> bool {
        let Some(pressed) = self.press.take() else {
            return false;
        };
        // Drag, not a click
        if pressed.distance(position) > CLICK_SLOP {
            self.last_click = None;
            return false;
        }

        let is_double = self.last_click.is_some_and(|(time, at)| {
            now.duration_since(time) < DOUBLE_CLICK_THRESHOLD
                && at.distance(position) <= CLICK_SLOP
        });
        self.last_click = if is_double { None } else { Some((now, position)) };
        is_double
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_quick_clicks_make_a_double_click() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        let p = Vec2::new(10.0, 10.0);
        clicks.press(p);
        assert!(!clicks.release_at(p, t0));
        clicks.press(p);
        assert!(clicks.release_at(p, t0 + Duration::from_millis(150)));
        // a third click starts over
        clicks.press(p);
        assert!(!clicks.release_at(p, t0 + Duration::from_millis(300)));
    }

    #[test]
    fn slow_clicks_are_single() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        let p = Vec2::new(10.0, 10.0);
        clicks.press(p);
        assert!(!clicks.release_at(p, t0));
        clicks.press(p);
        assert!(!clicks.release_at(p, t0 + Duration::from_millis(500)));
    }

    #[test]
    fn drags_break_the_sequence() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        clicks.press(Vec2::ZERO);
        assert!(!clicks.release_at(Vec2::ZERO, t0));
        clicks.press(Vec2::ZERO);
        assert!(!clicks.release_at(Vec2::new(30.0, 0.0), t0));
        clicks.press(Vec2::ZERO);
        assert!(!clicks.release_at(Vec2::ZERO, t0));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut clicks = ClickTracker::new();
        assert!(!clicks.release(Vec2::ZERO));
    }
}
