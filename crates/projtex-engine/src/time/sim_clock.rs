use std::time::{Duration, Instant};

/// Fixed-step simulation clock.
///
/// Simulated time advances only in whole ticks (1 ms by default). The runtime
/// pumps the clock on every event-loop wake-up; elapsed wall time is converted
/// into ticks and the remainder is carried over to the next pump.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: Duration,
    ticks: u64,
    last: Instant,
}

impl SimClock {
    pub fn new(tick: Duration) -> Self {
        Self::starting_at(tick, Instant::now())
    }

    /// Creates a clock whose first pump measures from `start`.
    pub fn starting_at(tick: Duration, start: Instant) -> Self {
        debug_assert!(!tick.is_zero());
        Self {
            tick: tick.max(Duration::from_nanos(1)),
            ticks: 0,
            last: start,
        }
    }

    /// Accumulates all whole ticks elapsed up to `now`; returns how many were added.
    pub fn pump(&mut self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.last);
        let tick_nanos = self.tick.as_nanos();
        let n = elapsed.as_nanos() / tick_nanos;
        if n == 0 {
            return 0;
        }

        let n = u64::try_from(n).unwrap_or(u64::MAX);
        self.ticks = self.ticks.saturating_add(n);
        // Advance by whole ticks only so the fractional remainder is not lost.
        self.last += self.tick.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX));
        n
    }

    /// Pumps against the current instant.
    pub fn pump_now(&mut self) -> u64 {
        self.pump(Instant::now())
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time in seconds.
    pub fn seconds(&self) -> f32 {
        (self.ticks as f64 * self.tick.as_secs_f64()) as f32
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> (SimClock, Instant) {
        let t0 = Instant::now();
        (SimClock::starting_at(Duration::from_millis(1), t0), t0)
    }

    #[test]
    fn starts_at_zero() {
        let (c, _) = clock();
        assert_eq!(c.ticks(), 0);
        assert_eq!(c.seconds(), 0.0);
    }

    #[test]
    fn pump_counts_whole_ticks() {
        let (mut c, t0) = clock();
        assert_eq!(c.pump(t0 + Duration::from_micros(2_500)), 2);
        assert_eq!(c.ticks(), 2);
    }

    #[test]
    fn remainder_carries_over() {
        let (mut c, t0) = clock();
        c.pump(t0 + Duration::from_micros(1_600));
        assert_eq!(c.pump(t0 + Duration::from_micros(2_100)), 1);
        assert_eq!(c.ticks(), 2);
    }

    #[test]
    fn seconds_follow_ticks() {
        let (mut c, t0) = clock();
        c.pump(t0 + Duration::from_millis(1_500));
        assert_eq!(c.ticks(), 1_500);
        assert!((c.seconds() - 1.5).abs() < 1.0e-6);
    }

    #[test]
    fn earlier_instant_adds_nothing() {
        let (mut c, t0) = clock();
        c.pump(t0 + Duration::from_millis(5));
        assert_eq!(c.pump(t0), 0);
        assert_eq!(c.ticks(), 5);
    }
}
