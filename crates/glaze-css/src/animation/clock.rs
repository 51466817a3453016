//! Time sources for transitions.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic time source, in seconds.
pub trait Clock {
    /// Seconds since some fixed origin. Never decreases.
    fn now(&self) -> f64;
}

/// Wall-clock time since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// A clock starting at zero now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to. Clones share the same time, so
/// a test can keep one handle and give another to a resolver.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// A clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to `seconds`. Going backwards is ignored.
    pub fn set(&self, seconds: f64) {
        if seconds > self.now.get() {
            self.now.set(seconds);
        }
    }

    /// Move forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_shared_and_monotonic() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(0.25);
        assert_eq!(clock.now(), 0.25);
        handle.set(0.1);
        assert_eq!(clock.now(), 0.25);
    }
}
