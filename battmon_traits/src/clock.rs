use std::thread;
use std::time::{Duration, Instant};

/// Monotonic clock and delay capability.
///
/// - now(): returns a monotonic Instant
/// - sleep(): blocks for the provided duration (implementations may simulate)
/// - ms_since(): elapsed milliseconds from an epoch Instant
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch`, saturating at 0 on underflow.
    fn ms_since(&self, epoch: Instant) -> u64 {
        let dur = self.now().saturating_duration_since(epoch);
        dur.as_millis().min(u128::from(u64::MAX)) as u64
    }
}

/// Real-time monotonic clock backed by `std::time::Instant` and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

#[cfg(any(test, feature = "test-clock"))]
pub mod test_clock {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct State {
        offset: Duration,
        sleeps: Vec<Duration>,
    }

    /// Deterministic clock that never blocks.
    ///
    /// now() = origin + offset; sleep(d) advances the offset by d and records d.
    /// Clones share state, so a test can keep a handle after moving one into a reader.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        origin: Instant,
        state: Arc<Mutex<State>>,
    }

    impl Default for TestClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestClock {
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
                state: Arc::new(Mutex::new(State::default())),
            }
        }

        /// Advance the clock without recording a sleep.
        pub fn advance(&self, d: Duration) {
            if let Ok(mut s) = self.state.lock() {
                s.offset = s.offset.saturating_add(d);
            }
        }

        /// Every duration passed to `sleep`, in call order.
        pub fn sleeps(&self) -> Vec<Duration> {
            self.state
                .lock()
                .map(|s| s.sleeps.clone())
                .unwrap_or_default()
        }

        /// Sum of all recorded sleeps.
        pub fn total_slept(&self) -> Duration {
            self.sleeps().iter().sum()
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            let off = self.state.lock().map(|s| s.offset).unwrap_or(Duration::ZERO);
            self.origin + off
        }

        fn sleep(&self, d: Duration) {
            if let Ok(mut s) = self.state.lock() {
                s.offset = s.offset.saturating_add(d);
                s.sleeps.push(d);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_clock::TestClock;
    use super::*;

    #[test]
    fn test_clock_records_sleeps_without_blocking() {
        let clock = TestClock::new();
        let epoch = clock.now();
        clock.sleep(Duration::from_micros(200));
        clock.sleep(Duration::from_micros(200));
        assert_eq!(clock.sleeps().len(), 2);
        assert_eq!(clock.total_slept(), Duration::from_micros(400));
        assert_eq!(clock.now() - epoch, Duration::from_micros(400));
    }

    #[test]
    fn advance_moves_time_but_not_sleeps() {
        let clock = TestClock::new();
        let epoch = clock.now();
        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.ms_since(epoch), 1500);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn monotonic_clock_zero_sleep_returns() {
        let clock = MonotonicClock::new();
        let epoch = clock.now();
        clock.sleep(Duration::ZERO);
        assert!(clock.ms_since(epoch) < 1000);
    }
}
