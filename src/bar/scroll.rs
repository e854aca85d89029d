//! Scroll-driven visibility and wheel-to-horizontal scrolling
//!
//! These are front-end-agnostic models: a front end feeds them events and applies the
//! returned offsets. The script in `templates/bar.html` follows the same rules.

use crate::config::UiSettings;
use crate::util::Throttle;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    /// Slid out of view while the page scrolls down
    Hidden,
    /// Closed by the user; stays closed for the page's lifetime
    Dismissed,
}

impl Visibility {
    /// CSS `bottom` offset in pixels
    pub fn bottom_offset(self, ui: &UiSettings) -> i32 {
        match self {
            Self::Shown => 0,
            Self::Hidden => ui.hidden_offset_px,
            Self::Dismissed => ui.dismissed_offset_px,
        }
    }
}

/// Tracks page scroll position to show or hide the bar
#[derive(Debug, Clone)]
pub struct ScrollState {
    prev_y: f64,
    visibility: Visibility,
    gate: Throttle,
}

impl ScrollState {
    pub fn new(initial_y: f64, throttle_ms: u64) -> Self {
        Self {
            prev_y: initial_y,
            visibility: Visibility::Shown,
            gate: Throttle::from_millis(throttle_ms),
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Handle a scroll event; `None` when throttled or dismissed
    pub fn on_scroll_at(&mut self, now: Instant, y: f64) -> Option<Visibility> {
        if self.visibility == Visibility::Dismissed || !self.gate.admit_at(now) {
            return None;
        }
        self.visibility = if y > self.prev_y {
            Visibility::Hidden
        } else {
            Visibility::Shown
        };
        self.prev_y = y;
        Some(self.visibility)
    }

    pub fn on_scroll(&mut self, y: f64) -> Option<Visibility> {
        self.on_scroll_at(Instant::now(), y)
    }

    /// Close button pressed
    pub fn dismiss(&mut self) -> Visibility {
        self.visibility = Visibility::Dismissed;
        self.visibility
    }
}

/// Turns vertical wheel motion over the link strip into horizontal scrolling
#[derive(Debug, Clone)]
pub struct WheelScroller {
    gate: Throttle,
    multiplier: f64,
}

impl WheelScroller {
    pub fn new(ui: &UiSettings) -> Self {
        Self {
            gate: Throttle::from_millis(ui.throttle_ms),
            multiplier: ui.wheel_multiplier,
        }
    }

    /// Horizontal scroll delta for a wheel event, if any
    pub fn on_wheel_at(&mut self, now: Instant, delta_y: f64) -> Option<f64> {
        if !self.gate.admit_at(now) || delta_y == 0.0 {
            return None;
        }
        Some(delta_y * self.multiplier)
    }

    pub fn on_wheel(&mut self, delta_y: f64) -> Option<f64> {
        self.on_wheel_at(Instant::now(), delta_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn test_scroll_down_hides_and_up_shows() {
        let t0 = Instant::now();
        let mut state = ScrollState::new(0.0, 100);
        assert_eq!(state.on_scroll_at(at(t0, 0), 200.0), Some(Visibility::Hidden));
        assert_eq!(state.on_scroll_at(at(t0, 100), 150.0), Some(Visibility::Shown));
        assert_eq!(state.on_scroll_at(at(t0, 200), 150.0), Some(Visibility::Shown));
    }

    #[test]
    fn test_scroll_is_throttled() {
        let t0 = Instant::now();
        let mut state = ScrollState::new(0.0, 100);
        assert!(state.on_scroll_at(at(t0, 0), 10.0).is_some());
        assert_eq!(state.on_scroll_at(at(t0, 30), 0.0), None);
        assert_eq!(state.visibility(), Visibility::Hidden);
        assert_eq!(state.on_scroll_at(at(t0, 150), 0.0), Some(Visibility::Shown));
    }

    #[test]
    fn test_dismissed_ignores_scroll() {
        let t0 = Instant::now();
        let mut state = ScrollState::new(0.0, 100);
        assert_eq!(state.dismiss(), Visibility::Dismissed);
        assert_eq!(state.on_scroll_at(at(t0, 0), 0.0), None);
        assert_eq!(state.visibility(), Visibility::Dismissed);
    }

    #[test]
    fn test_bottom_offsets() {
        let ui = UiSettings::default();
        assert_eq!(Visibility::Shown.bottom_offset(&ui), 0);
        assert_eq!(Visibility::Hidden.bottom_offset(&ui), -48);
        assert_eq!(Visibility::Dismissed.bottom_offset(&ui), -40);
    }

    #[test]
    fn test_wheel_scrolls_horizontally() {
        let t0 = Instant::now();
        let mut wheel = WheelScroller::new(&UiSettings::default());
        assert_eq!(wheel.on_wheel_at(at(t0, 0), 25.0), Some(100.0));
        assert_eq!(wheel.on_wheel_at(at(t0, 50), 25.0), None);
        assert_eq!(wheel.on_wheel_at(at(t0, 100), -10.0), Some(-40.0));
    }

    #[test]
    fn test_wheel_ignores_zero_delta() {
        let mut wheel = WheelScroller::new(&UiSettings::default());
        assert_eq!(wheel.on_wheel_at(Instant::now(), 0.0), None);
    }
}
