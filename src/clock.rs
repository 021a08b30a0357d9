use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
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
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to; used to drive rounds in tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Periodic tick source for one round.
///
/// A timer is tied to the round it was armed for through `generation`; the
/// session drops it when that round ends so a stale timer never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimer {
    generation: u64,
    period: Duration,
    next_due: Duration,
}

impl RoundTimer {
    pub const PERIOD: Duration = Duration::from_secs(1);

    pub fn arm(generation: u64, now: Duration) -> Self {
        Self::with_period(generation, now, Self::PERIOD)
    }

    pub fn with_period(generation: u64, now: Duration, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            generation,
            period,
            next_due: now + period,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of whole periods that elapsed since the last poll
    pub fn due_ticks(&mut self, now: Duration) -> u32 {
        let mut ticks = 0;
        while now >= self.next_due {
            self.next_due += self.period;
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now(), Duration::from_millis(1500));
    }

    #[test]
    fn shared_clock_sees_advances() {
        let clock = Rc::new(ManualClock::new());
        let shared = Rc::clone(&clock);
        clock.advance(Duration::from_secs(3));
        assert_eq!(shared.now(), Duration::from_secs(3));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn timer_counts_whole_periods() {
        let mut timer = RoundTimer::arm(1, Duration::ZERO);
        assert_eq!(timer.due_ticks(Duration::from_millis(999)), 0);
        assert_eq!(timer.due_ticks(Duration::from_millis(2500)), 2);
        assert_eq!(timer.due_ticks(Duration::from_millis(2999)), 0);
        assert_eq!(timer.due_ticks(Duration::from_secs(3)), 1);
        assert_eq!(timer.generation(), 1);
    }

    #[test]
    fn timer_starts_counting_from_arm_time() {
        let mut timer = RoundTimer::arm(0, Duration::from_secs(10));
        assert_eq!(timer.due_ticks(Duration::from_secs(10)), 0);
        assert_eq!(timer.due_ticks(Duration::from_secs(11)), 1);
    }
}
