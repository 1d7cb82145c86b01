use std::time::Instant;

/// Time sources the app reads. Monotonic time drives the timer while the
/// process is alive; wall-clock time bridges the gap while it is not.
pub trait Clock {
    /// Milliseconds on a monotonic clock with an arbitrary origin.
    fn now_ms(&self) -> u64;
    /// Milliseconds since the Unix epoch.
    fn wall_clock_ms(&self) -> i64;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn wall_clock_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
pub mod fake {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::Clock;

    /// Hand-cranked clock; clones share the same time.
    #[derive(Clone, Default)]
    pub struct FakeClock {
        now: Rc<Cell<u64>>,
        wall: Rc<Cell<i64>>,
    }

    impl FakeClock {
        pub fn new(now_ms: u64, wall_ms: i64) -> Self {
            let clock = Self::default();
            clock.now.set(now_ms);
            clock.wall.set(wall_ms);
            clock
        }

        /// Both clocks move forward together.
        pub fn advance(&self, ms: u64) {
            self.now.set(self.now.get() + ms);
            self.wall.set(self.wall.get() + ms as i64);
        }

        /// Only the wall clock moves, as when the process is not running.
        pub fn advance_wall(&self, ms: i64) {
            self.wall.set(self.wall.get() + ms);
        }
    }

    impl Clock for FakeClock {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }

        fn wall_clock_ms(&self) -> i64 {
            self.wall.get()
        }
    }
}
