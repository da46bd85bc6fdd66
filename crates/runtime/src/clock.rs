use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use foundation::time::Time;

/// Source of "now" for animations.
///
/// Everything time-dependent reads the clock through this trait so tests can
/// drive animations by advancing a [`VirtualClock`] instead of sleeping.
pub trait Clock {
    fn now(&self) -> Time;
}

/// Manually advanced clock.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to the component under test.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_s: Rc<Cell<f64>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: Time) -> Self {
        Self {
            now_s: Rc::new(Cell::new(t.0)),
        }
    }

    pub fn advance(&self, seconds: f64) {
        self.now_s.set(self.now_s.get() + seconds.max(0.0));
    }

    pub fn set(&self, t: Time) {
        self.now_s.set(t.0);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Time {
        Time(self.now_s.get())
    }
}

/// Monotonic wall clock, measured from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
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
    fn now(&self) -> Time {
        Time(self.origin.elapsed().as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, SystemClock, VirtualClock};
    use foundation::time::Time;

    #[test]
    fn virtual_clock_clones_share_time() {
        let clock = VirtualClock::new();
        let handle = clock.clone();
        handle.advance(0.25);
        handle.advance(-5.0);
        assert_eq!(clock.now(), Time(0.25));
        clock.set(Time(10.0));
        assert_eq!(handle.now(), Time(10.0));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b.0 >= a.0);
    }
}
