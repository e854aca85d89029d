//! Leading-edge throttling for high-frequency event handlers
//!
//! The first call in a window runs immediately; calls that arrive before the window
//! closes are dropped, never queued.

use std::time::{Duration, Instant};

/// Gate admitting at most one call per `limit`
#[derive(Debug, Clone)]
pub struct Throttle {
    limit: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self { limit, last: None }
    }

    pub fn from_millis(limit_ms: u64) -> Self {
        Self::new(Duration::from_millis(limit_ms))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Whether a call arriving at `now` may run; an admitted call opens a new window
    pub fn admit_at(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.limit => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn admit(&mut self) -> bool {
        self.admit_at(Instant::now())
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::from_millis(crate::DEFAULT_THROTTLE_MS)
    }
}

/// A callback wrapped in a [`Throttle`], for front ends that hand over a handler
/// instead of asking [`Throttle::admit_at`] themselves
pub struct Throttled<F> {
    gate: Throttle,
    callback: F,
}

impl<F> Throttled<F> {
    pub fn new(callback: F, limit: Duration) -> Self {
        Self {
            gate: Throttle::new(limit),
            callback,
        }
    }

    /// Run the callback if the gate admits a call at `now`
    pub fn call_at<A, R>(&mut self, now: Instant, arg: A) -> Option<R>
    where
        F: FnMut(A) -> R,
    {
        if self.gate.admit_at(now) {
            Some((self.callback)(arg))
        } else {
            None
        }
    }

    pub fn call<A, R>(&mut self, arg: A) -> Option<R>
    where
        F: FnMut(A) -> R,
    {
        self.call_at(Instant::now(), arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_calls_are_dropped() {
        let t0 = Instant::now();
        let mut fired = Vec::new();
        let mut throttled = Throttled::new(|t: u64| fired.push(t), Duration::from_millis(100));

        for t in [0u64, 30, 150] {
            throttled.call_at(t0 + Duration::from_millis(t), t);
        }
        drop(throttled);

        assert_eq!(fired, vec![0, 150]);
    }

    #[test]
    fn test_window_reopens_at_limit() {
        let t0 = Instant::now();
        let mut gate = Throttle::from_millis(100);
        assert!(gate.admit_at(t0));
        assert!(!gate.admit_at(t0 + Duration::from_millis(99)));
        assert!(gate.admit_at(t0 + Duration::from_millis(100)));
        assert!(!gate.admit_at(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn test_call_returns_callback_result() {
        let t0 = Instant::now();
        let mut doubled = Throttled::new(|x: i32| x * 2, Duration::from_millis(100));
        assert_eq!(doubled.call_at(t0, 4), Some(8));
        assert_eq!(doubled.call_at(t0 + Duration::from_millis(10), 5), None);
    }
}
